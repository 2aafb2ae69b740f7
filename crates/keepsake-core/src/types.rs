//! Strong type definitions for keepsake.
//!
//! Sequence numbers and path components are newtypes so a user name can never
//! be passed where a store kind is expected, and neither can smuggle a path
//! separator into the on-disk layout.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// A per-store insertion sequence number.
///
/// Sequence numbers start at 1 and strictly increase within a store. They
/// define insertion order and therefore recency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seq(pub u64);

impl Seq {
    /// The first sequence number handed out by an empty store.
    pub const FIRST: Self = Self(1);

    /// The sequence number following this one, or `None` once `u64` is
    /// exhausted.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Get the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Seq {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Longest accepted name, in bytes. Matches the common filesystem limit.
const MAX_NAME_LEN: usize = 255;

/// Check that `name` is usable as a single directory component.
fn validate_component(what: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CoreError::invalid_argument(format!("{} must not be empty", what)));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::invalid_argument(format!(
            "{} is {} bytes, limit is {}",
            what,
            name.len(),
            MAX_NAME_LEN
        )));
    }
    if name == "." || name == ".." {
        return Err(CoreError::invalid_argument(format!("{} must not be {:?}", what, name)));
    }
    if let Some(c) = name
        .chars()
        .find(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
    {
        return Err(CoreError::invalid_argument(format!(
            "{} {:?} contains forbidden character {:?}",
            what, name, c
        )));
    }
    Ok(())
}

/// The user or profile that owns a store's data.
///
/// Every record and the configuration slot live under a directory named
/// after the namespace, so two users never see each other's data.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserNamespace(String);

impl UserNamespace {
    /// Validate and wrap a user name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_component("user namespace", &name)?;
        Ok(Self(name))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserNamespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserNamespace {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserNamespace {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<UserNamespace> for String {
    fn from(value: UserNamespace) -> Self {
        value.0
    }
}

/// The entity kind a store holds, e.g. `scan_history` or `config`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreKind(String);

impl StoreKind {
    /// Validate and wrap a kind name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_component("store kind", &name)?;
        Ok(Self(name))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoreKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
