//! Sample entity types.
//!
//! Shaped after what a file-carving scanner records per run, so tests read
//! like real usage rather than `Vec<u8>` shuffling.

use serde::{Deserialize, Serialize};

/// Outcome of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Completed,
    Cancelled,
    Failed,
}

/// One entry of scan history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Device or image that was scanned.
    pub source: String,
    /// Where recovered files were written.
    pub output_dir: String,
    /// Start time (Unix ms).
    pub started_at: i64,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Bytes read from the source.
    pub bytes_scanned: u64,
    /// Number of files carved out.
    pub files_recovered: u32,
    /// File types found, by extension.
    pub file_types: Vec<String>,
    pub status: ScanStatus,
}

impl ScanRecord {
    /// A deterministic record distinguished by `n`.
    pub fn sample(n: u32) -> Self {
        Self {
            source: format!("/dev/sd{}", (b'a' + (n % 26) as u8) as char),
            output_dir: format!("/home/user/recovered/{}", n),
            started_at: 1_700_000_000_000 + i64::from(n) * 60_000,
            duration_ms: 1_000 + u64::from(n),
            bytes_scanned: u64::from(n) * 4096,
            files_recovered: n,
            file_types: vec!["jpg".to_string(), "pdf".to_string()],
            status: ScanStatus::Completed,
        }
    }
}

/// Application settings persisted in the config slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub output_dir: String,
    pub block_size: u32,
    pub max_file_size: u64,
    pub enabled_formats: Vec<String>,
    pub dark_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_dir: "recovered".to_string(),
            block_size: 512,
            max_file_size: 1 << 30,
            enabled_formats: vec!["jpg".to_string(), "png".to_string(), "pdf".to_string()],
            dark_mode: false,
        }
    }
}
