//! Proptest generators for property-based testing.

use proptest::prelude::*;

use crate::entities::{AppSettings, ScanRecord, ScanStatus};

/// Generate a valid user namespace string.
pub fn user_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_. -]{0,31}".prop_map(String::from)
}

/// Generate a ScanStatus.
pub fn scan_status() -> impl Strategy<Value = ScanStatus> {
    prop_oneof![
        Just(ScanStatus::Completed),
        Just(ScanStatus::Cancelled),
        Just(ScanStatus::Failed),
    ]
}

/// Generate an arbitrary scan record.
pub fn scan_record() -> impl Strategy<Value = ScanRecord> {
    (
        "/dev/[a-z]{2,4}",
        ".{0,64}",
        any::<i64>(),
        any::<u64>(),
        any::<u64>(),
        any::<u32>(),
        prop::collection::vec("[a-z0-9]{1,5}", 0..8),
        scan_status(),
    )
        .prop_map(
            |(source, output_dir, started_at, duration_ms, bytes_scanned, files_recovered, file_types, status)| {
                ScanRecord {
                    source,
                    output_dir,
                    started_at,
                    duration_ms,
                    bytes_scanned,
                    files_recovered,
                    file_types,
                    status,
                }
            },
        )
}

/// Generate arbitrary application settings.
pub fn app_settings() -> impl Strategy<Value = AppSettings> {
    (
        ".{0,64}",
        any::<u32>(),
        any::<u64>(),
        prop::collection::vec("[a-z0-9]{1,5}", 0..8),
        any::<bool>(),
    )
        .prop_map(
            |(output_dir, block_size, max_file_size, enabled_formats, dark_mode)| AppSettings {
                output_dir,
                block_size,
                max_file_size,
                enabled_formats,
                dark_mode,
            },
        )
}
