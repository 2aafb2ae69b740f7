//! On-disk layout: where a store lives and how its files are named.
//!
//! ```text
//! <data_dir>/<kind>/<user>/00000000000000000001.rec
//! <data_dir>/<kind>/<user>/00000000000000000002.rec
//! <data_dir>/config/<user>/config.json
//! ```
//!
//! Record names are the sequence number zero-padded to 20 digits (the width of
//! `u64::MAX`), so a lexicographic directory listing is also insertion order.

use std::path::{Path, PathBuf};

use keepsake_core::{Seq, StoreKind, UserNamespace};

/// Extension of sealed record files.
pub const RECORD_EXT: &str = "rec";

/// Suffix of in-flight atomic writes.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Name of the writability probe written at open.
pub const PROBE_NAME: &str = ".keepsake-probe";

/// Default file name of the configuration slot.
pub const CONFIG_FILE: &str = "config.json";

const SEQ_WIDTH: usize = 20;

/// File name for the record with the given sequence number.
pub fn record_file_name(seq: Seq) -> String {
    format!("{:0width$}.{}", seq.get(), RECORD_EXT, width = SEQ_WIDTH)
}

/// Parse a record file name back into its sequence number.
///
/// Returns `None` for anything that is not exactly a record name, including
/// temp files and probes.
pub fn parse_record_file_name(name: &str) -> Option<Seq> {
    let stem = name.strip_suffix(RECORD_EXT)?.strip_suffix('.')?;
    if stem.len() != SEQ_WIDTH || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok().map(Seq)
}

/// Temp-file path used while atomically writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

/// Whether a file name belongs to an interrupted atomic write.
pub fn is_temp_name(name: &str) -> bool {
    name.ends_with(TEMP_SUFFIX)
}

/// Identity of a record store: `(root, user)`.
///
/// `root` is the directory for one entity kind, typically
/// `<data_dir>/<kind>`. Two handles with equal identity address the same
/// files; different identities never share a directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreHandle {
    root: PathBuf,
    user: UserNamespace,
}

impl StoreHandle {
    /// Handle for `user` under an explicit kind root.
    pub fn new(root: impl Into<PathBuf>, user: UserNamespace) -> Self {
        Self {
            root: root.into(),
            user,
        }
    }

    /// Handle for `user` under `<data_dir>/<kind>`.
    pub fn in_data_dir(data_dir: impl AsRef<Path>, kind: &StoreKind, user: UserNamespace) -> Self {
        Self::new(data_dir.as_ref().join(kind.as_str()), user)
    }

    /// The kind root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The owning user.
    pub fn user(&self) -> &UserNamespace {
        &self.user
    }

    /// The entity kind, taken from the root's last component.
    pub fn kind(&self) -> Option<&str> {
        self.root.file_name().and_then(|n| n.to_str())
    }

    /// The directory holding this store's files.
    pub fn dir(&self) -> PathBuf {
        self.root.join(self.user.as_str())
    }

    /// Path of the record with the given sequence number.
    pub fn record_path(&self, seq: Seq) -> PathBuf {
        self.dir().join(record_file_name(seq))
    }
}
