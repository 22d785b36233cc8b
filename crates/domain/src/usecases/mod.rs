//! Application use cases / business logic

pub mod fingerprint;
pub mod scan;

pub use fingerprint::{FingerprintError, VCS_DIR_NAME, fingerprint_dir};
pub use scan::{HistoryScanner, RevisionError, ScanError};
