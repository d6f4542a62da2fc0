use aws_sdk_s3::{
    error::{ProvideErrorMetadata, SdkError},
    operation::{get_object::GetObjectError, list_objects::ListObjectsError},
};
use std::{fmt, io};
use thiserror::Error;

/// Every failure the bucket lister can report.
///
/// Anything the storage service (or the SDK on its way there) rejects lands in
/// [`ServiceError::Service`] unless it is one of the not-found cases callers
/// are expected to tell apart.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("bucket `{name}` invalid: {reason}")]
    InvalidBucketName { name: String, reason: String },
    #[error("region `{0}` is not a valid region identifier")]
    InvalidRegion(String),
    #[error("invalid object key")]
    InvalidObjectKey,
    #[error("bucket `{0}` not found")]
    BucketNotFound(String),
    #[error("object `{key}` not found in bucket `{bucket}`")]
    ObjectNotFound { bucket: String, key: String },
    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        code: Option<String>,
        message: String,
        #[source]
        source: Box<aws_sdk_s3::Error>,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// True for the bucket and object not-found cases.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::BucketNotFound(_) | ServiceError::ObjectNotFound { .. }
        )
    }

    /// Classify a failed `ListObjects` call.
    pub(crate) fn from_list_objects<R>(bucket: &str, err: SdkError<ListObjectsError, R>) -> Self
    where
        R: fmt::Debug + Send + Sync + 'static,
    {
        let missing_bucket = matches!(
            err.as_service_error(),
            Some(ListObjectsError::NoSuchBucket(_))
        ) || err.code() == Some("NoSuchBucket");
        if missing_bucket {
            return ServiceError::BucketNotFound(bucket.to_string());
        }
        Self::service("ListObjects", err)
    }

    /// Classify a failed `GetObject` call.
    pub(crate) fn from_get_object<R>(
        bucket: &str,
        key: &str,
        err: SdkError<GetObjectError, R>,
    ) -> Self
    where
        R: fmt::Debug + Send + Sync + 'static,
    {
        if matches!(err.as_service_error(), Some(GetObjectError::NoSuchKey(_)))
            || err.code() == Some("NoSuchKey")
        {
            return ServiceError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            };
        }
        if err.code() == Some("NoSuchBucket") {
            return ServiceError::BucketNotFound(bucket.to_string());
        }
        Self::service("GetObject", err)
    }

    fn service<E, R>(operation: &'static str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: fmt::Debug + Send + Sync + 'static,
        aws_sdk_s3::Error: From<SdkError<E, R>>,
    {
        let code = err.code().map(str::to_string);
        // The full cause chain travels in `source`; keep only the top line here.
        let message = err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        ServiceError::Service {
            operation,
            code,
            message,
            source: Box::new(aws_sdk_s3::Error::from(err)),
        }
    }
}
