//! src/services/bucket_lister.rs
//!
//! BucketLister: read-only access to a remote S3 bucket. One call per
//! operation, first page only, no retries beyond what the SDK does on its own.

use crate::{
    errors::{ServiceError, ServiceResult},
    models::{
        download::DownloadReport,
        listing::{ListingRequest, ListingResponse},
    },
};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

const MAX_OBJECT_KEY_LEN: usize = 1024;
const BUCKET_NAME_MAX_LEN: usize = 255;
const REGION_MAX_LEN: usize = 32;

/// Lists and fetches objects from an S3 bucket.
///
/// Cloning is cheap; the underlying SDK client is reference counted.
#[derive(Clone, Debug)]
pub struct BucketLister {
    client: Client,
}

impl BucketLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client for `region` using the SDK's default credential chain.
    pub async fn connect(region: &str) -> ServiceResult<Self> {
        ensure_region_valid(region)?;
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        debug!("loaded SDK config for region {}", region);
        Ok(Self::new(Client::new(&sdk_config)))
    }

    /// List the first page of objects in `request.bucket`.
    ///
    /// The reply is returned untouched. A bucket that does not exist maps to
    /// `BucketNotFound`; every other failure is `Service`.
    pub async fn list_objects(&self, request: &ListingRequest) -> ServiceResult<ListingResponse> {
        ensure_bucket_name_safe(&request.bucket)?;
        ensure_region_valid(&request.region)?;

        let op = self.client.list_objects().bucket(&request.bucket);
        let same_region = self
            .client
            .config()
            .region()
            .is_some_and(|r| r.to_string() == request.region);

        debug!(
            "listing bucket {} in {} (client region matches: {})",
            request.bucket, request.region, same_region
        );

        let result = if same_region {
            op.send().await
        } else {
            op.customize()
                .config_override(
                    aws_sdk_s3::config::Builder::default()
                        .region(Region::new(request.region.clone())),
                )
                .send()
                .await
        };
        let output = result.map_err(|err| ServiceError::from_list_objects(&request.bucket, err))?;

        let response = ListingResponse::new(output);
        info!(
            "listed {} objects from {} (truncated: {})",
            response.objects().len(),
            request.bucket,
            response.is_truncated()
        );
        Ok(response)
    }

    /// Download `key` from `bucket` into `destination`, replacing any file there.
    ///
    /// The body is streamed into a temporary file beside the destination and
    /// renamed into place once complete, so a failed transfer leaves any
    /// previous file at `destination` as it was.
    pub async fn download_object(
        &self,
        bucket: &str,
        key: &str,
        destination: impl AsRef<Path>,
    ) -> ServiceResult<DownloadReport> {
        ensure_bucket_name_safe(bucket)?;
        ensure_key_valid(key)?;
        let destination = destination.as_ref();

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| ServiceError::from_get_object(bucket, key, err))?;
        let content_length = output.content_length();
        let mut body = output.body;

        let parent = destination_dir(destination);
        fs::create_dir_all(&parent).await?;
        let tmp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;

        let mut bytes_written: u64 = 0;
        loop {
            let chunk = match body.try_next().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(err) => {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(ServiceError::Io(io::Error::other(err)));
                }
            };
            if let Err(err) = file.write_all(&chunk).await {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(ServiceError::Io(err));
            }
            bytes_written += chunk.len() as u64;
        }
        if let Err(err) = file.flush().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ServiceError::Io(err));
        }
        if let Err(err) = file.sync_all().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ServiceError::Io(err));
        }
        drop(file);

        replace_file(&tmp_path, destination).await?;

        let report = DownloadReport {
            path: destination.to_path_buf(),
            bytes_written,
            content_length,
        };
        if content_length.is_some() && !report.matches_reported_size() {
            warn!(
                "{}/{}: wrote {} bytes but service reported {:?}",
                bucket, key, bytes_written, content_length
            );
        }
        info!(
            "downloaded {}/{} to {} ({} bytes)",
            bucket,
            key,
            destination.display(),
            bytes_written
        );
        Ok(report)
    }
}

/// Directory the temporary download file is created in.
///
/// A bare file name has an empty parent, which means the working directory.
fn destination_dir(destination: &Path) -> PathBuf {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Move a finished temp file over `destination`.
///
/// Platforms that refuse to rename onto an existing file get the old file
/// removed first. On any failure the temp file is removed.
async fn replace_file(tmp_path: &Path, destination: &Path) -> io::Result<()> {
    let result = match fs::rename(tmp_path, destination).await {
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            match fs::remove_file(destination).await {
                Ok(()) => fs::rename(tmp_path, destination).await,
                Err(err) => Err(err),
            }
        }
        other => other,
    };
    if result.is_err() {
        let _ = fs::remove_file(tmp_path).await;
    }
    result
}

/// Object keys must be non-empty and at most 1024 bytes.
fn ensure_key_valid(key: &str) -> ServiceResult<()> {
    if key.is_empty() || key.len() > MAX_OBJECT_KEY_LEN {
        return Err(ServiceError::InvalidObjectKey);
    }
    Ok(())
}

/// Validate bucket name format.
///
/// Accepts anything S3 can still list, legacy us-east-1 names included:
/// 1–255 characters of letters, digits, dots, hyphens and underscores.
/// Whether the bucket exists is left to the service.
fn ensure_bucket_name_safe(name: &str) -> ServiceResult<()> {
    let invalid = |reason: &str| ServiceError::InvalidBucketName {
        name: name.to_string(),
        reason: reason.into(),
    };

    if name.is_empty() || name.len() > BUCKET_NAME_MAX_LEN {
        return Err(invalid("must be between 1 and 255 characters"));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(invalid(
            "allowed characters are letters, digits, dots, hyphens, and underscores",
        ));
    }

    Ok(())
}

/// Region identifiers look like `us-east-1` or `us-gov-west-1`: lowercase
/// letters, digits and hyphens, with at least one hyphen separating parts.
fn ensure_region_valid(region: &str) -> ServiceResult<()> {
    let well_formed = !region.is_empty()
        && region.len() <= REGION_MAX_LEN
        && region
            .split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| matches!(c, 'a'..='z' | '0'..='9')))
        && region.contains('-');
    if well_formed {
        Ok(())
    } else {
        Err(ServiceError::InvalidRegion(region.to_string()))
    }
}
