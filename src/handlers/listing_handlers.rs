//! Command handlers: run one lister operation and write its result.
//!
//! Nothing reaches the writer until the service call has succeeded, so a
//! failed run prints no partial listing.

use crate::{
    config::OutputFormat,
    models::{
        download::DownloadReport,
        listing::{ListingRequest, ListingResponse},
    },
    services::bucket_lister::BucketLister,
};
use anyhow::Result;
use std::{io::Write, path::Path};

/// List `request.bucket` and print the reply to `out` in `format`.
pub async fn list_objects<W: Write>(
    lister: &BucketLister,
    request: &ListingRequest,
    format: OutputFormat,
    out: &mut W,
) -> Result<ListingResponse> {
    let response = lister.list_objects(request).await?;
    render_listing(&response, format, out)?;
    Ok(response)
}

/// Fetch one object to `dest`. Prints nothing; the report is logged by the lister.
pub async fn download_object(
    lister: &BucketLister,
    bucket: &str,
    key: &str,
    dest: &Path,
) -> Result<DownloadReport> {
    Ok(lister.download_object(bucket, key, dest).await?)
}

pub fn render_listing<W: Write>(
    response: &ListingResponse,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Debug => writeln!(out, "{:#?}", response.output())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &response.summary())?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use aws_sdk_s3::{
        Client,
        config::retry::RetryConfig,
        operation::list_objects::{ListObjectsError, ListObjectsOutput},
        types::{Object, error::NoSuchBucket},
    };
    use aws_smithy_mocks::{RuleMode, mock, mock_client};
    use aws_smithy_runtime_api::http::{Response as HttpResponse, StatusCode};
    use aws_smithy_types::body::SdkBody;
    use serde_json::Value;

    fn listing() -> ListObjectsOutput {
        ListObjectsOutput::builder()
            .name("1000genomes")
            .contents(
                Object::builder()
                    .key("alignment_indices/20130502.low_coverage.alignment.index")
                    .size(1_207_458)
                    .build(),
            )
            .build()
    }

    #[tokio::test]
    async fn prints_raw_reply_by_default() {
        let rule = mock!(Client::list_objects).then_output(listing);
        let lister = BucketLister::new(mock_client!(aws_sdk_s3, [&rule]));
        let mut out = Vec::new();

        list_objects(&lister, &ListingRequest::default(), OutputFormat::Debug, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ListObjectsOutput"));
        assert!(text.contains("1000genomes"));
        assert!(text.contains("20130502.low_coverage.alignment.index"));
    }

    #[tokio::test]
    async fn json_output_lists_every_entry() {
        let rule = mock!(Client::list_objects).then_output(listing);
        let lister = BucketLister::new(mock_client!(aws_sdk_s3, [&rule]));
        let mut out = Vec::new();

        list_objects(&lister, &ListingRequest::default(), OutputFormat::Json, &mut out)
            .await
            .unwrap();

        let doc: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["bucket"], "1000genomes");
        assert_eq!(doc["is_truncated"], false);
        assert_eq!(doc["objects"].as_array().map(Vec::len), Some(1));
        assert_eq!(doc["objects"][0]["size_bytes"], 1_207_458);
    }

    #[tokio::test]
    async fn failed_listing_prints_nothing() {
        let rule = mock!(Client::list_objects)
            .then_error(|| ListObjectsError::NoSuchBucket(NoSuchBucket::builder().build()));
        let lister = BucketLister::new(mock_client!(aws_sdk_s3, [&rule]));
        let mut out = Vec::new();

        let err = list_objects(
            &lister,
            &ListingRequest::new("not-a-real-bucket", "us-east-1"),
            OutputFormat::Debug,
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(out.is_empty());
        let service_err = err.downcast_ref::<ServiceError>().expect("typed error");
        assert!(service_err.is_not_found());
    }

    #[tokio::test]
    async fn unreachable_service_prints_nothing() {
        let rule = mock!(Client::list_objects).then_http_response(|| {
            HttpResponse::new(StatusCode::try_from(503).unwrap(), SdkBody::empty())
        });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, [&rule], |conf| {
            conf.retry_config(RetryConfig::disabled())
        });
        let lister = BucketLister::new(client);
        let mut out = Vec::new();

        let err = list_objects(&lister, &ListingRequest::default(), OutputFormat::Json, &mut out)
            .await
            .unwrap_err();

        assert!(out.is_empty());
        let service_err = err.downcast_ref::<ServiceError>().expect("typed error");
        assert!(matches!(service_err, ServiceError::Service { .. }));
    }
}
