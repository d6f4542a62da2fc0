//! Outcome of fetching a single object to disk.

use std::path::PathBuf;

/// Where a downloaded object ended up and how much of it arrived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadReport {
    /// Final location of the payload.
    pub path: PathBuf,

    /// Bytes actually written to `path`.
    pub bytes_written: u64,

    /// Size the service announced for the object, if it sent one.
    pub content_length: Option<i64>,
}

impl DownloadReport {
    /// True when the service announced a size and the written payload matches it.
    pub fn matches_reported_size(&self) -> bool {
        self.content_length
            .is_some_and(|len| u64::try_from(len).is_ok_and(|len| len == self.bytes_written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(bytes_written: u64, content_length: Option<i64>) -> DownloadReport {
        DownloadReport {
            path: PathBuf::from("cram.cram"),
            bytes_written,
            content_length,
        }
    }

    #[test]
    fn size_matches_only_when_announced() {
        assert!(report(42, Some(42)).matches_reported_size());
        assert!(!report(41, Some(42)).matches_reported_size());
        assert!(!report(42, None).matches_reported_size());
        assert!(!report(0, Some(-1)).matches_reported_size());
    }
}
