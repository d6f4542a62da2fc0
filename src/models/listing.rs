//! Request and response of a single bucket listing.

use super::object::ObjectEntry;
use aws_sdk_s3::{operation::list_objects::ListObjectsOutput, types::Object};
use serde::Serialize;

/// Bucket queried when nothing else is configured.
pub const DEFAULT_BUCKET: &str = "1000genomes";

/// Region the default bucket lives in.
pub const DEFAULT_REGION: &str = "us-east-1";

/// What to list and where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingRequest {
    pub bucket: String,
    pub region: String,
}

impl ListingRequest {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
        }
    }
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET, DEFAULT_REGION)
    }
}

/// The first page of a `ListObjects` reply, exactly as the service sent it.
#[derive(Clone, Debug)]
pub struct ListingResponse {
    output: ListObjectsOutput,
}

impl ListingResponse {
    pub(crate) fn new(output: ListObjectsOutput) -> Self {
        Self { output }
    }

    /// Bucket name echoed back by the service.
    pub fn bucket_name(&self) -> Option<&str> {
        self.output.name()
    }

    pub fn objects(&self) -> &[Object] {
        self.output.contents()
    }

    pub fn is_truncated(&self) -> bool {
        self.output.is_truncated().unwrap_or(false)
    }

    pub fn output(&self) -> &ListObjectsOutput {
        &self.output
    }

    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            bucket: self.bucket_name().map(str::to_string),
            prefix: self.output.prefix().map(str::to_string),
            is_truncated: self.is_truncated(),
            next_marker: self.output.next_marker().map(str::to_string),
            objects: self.objects().iter().map(ObjectEntry::from).collect(),
        }
    }
}

/// JSON rendering of a listing.
#[derive(Serialize, Clone, Debug)]
pub struct ListingSummary {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
    pub objects: Vec<ObjectEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ListingResponse {
        ListingResponse::new(
            ListObjectsOutput::builder()
                .name("1000genomes")
                .is_truncated(true)
                .next_marker("phase3/")
                .contents(Object::builder().key("release/").size(0).build())
                .contents(
                    Object::builder()
                        .key("README.analysis_history")
                        .size(4096)
                        .build(),
                )
                .build(),
        )
    }

    #[test]
    fn default_request_targets_public_bucket() {
        let req = ListingRequest::default();
        assert_eq!(req.bucket, "1000genomes");
        assert_eq!(req.region, "us-east-1");
    }

    #[test]
    fn exposes_bucket_echo_and_entries() {
        let resp = sample();
        assert_eq!(resp.bucket_name(), Some("1000genomes"));
        let keys: Vec<_> = resp.objects().iter().filter_map(|o| o.key()).collect();
        assert_eq!(keys, vec!["release/", "README.analysis_history"]);
        assert!(resp.is_truncated());
    }

    #[test]
    fn summary_keeps_every_entry() {
        let summary = sample().summary();
        assert_eq!(summary.bucket.as_deref(), Some("1000genomes"));
        assert_eq!(summary.next_marker.as_deref(), Some("phase3/"));
        assert_eq!(summary.objects.len(), 2);
        assert_eq!(summary.objects[1].size_bytes, Some(4096));
    }
}
