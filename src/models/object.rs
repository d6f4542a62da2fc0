//! A serializable view of one entry in a bucket listing.

use aws_sdk_s3::types::Object;
use aws_smithy_types_convert::date_time::DateTimeExt;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One object as reported by the listing.
///
/// Fields the service omitted stay `None`; nothing is filled in locally.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Object key (path-like identifier within the bucket).
    pub key: String,

    /// Size in bytes.
    pub size_bytes: Option<i64>,

    /// ETag as returned by the service, quotes included.
    pub etag: Option<String>,

    /// Storage class (e.g., STANDARD, GLACIER).
    pub storage_class: Option<String>,

    /// When the object was last modified.
    pub last_modified: Option<DateTime<Utc>>,
}

impl From<&Object> for ObjectEntry {
    fn from(object: &Object) -> Self {
        Self {
            key: object.key().unwrap_or_default().to_string(),
            size_bytes: object.size(),
            etag: object.e_tag().map(str::to_string),
            storage_class: object.storage_class().map(|c| c.as_str().to_string()),
            last_modified: object
                .last_modified()
                .and_then(|ts| ts.to_chrono_utc().ok()),
        }
    }
}
