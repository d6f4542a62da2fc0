use anyhow::Result;
use std::io;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use config::{Action, AppConfig};
use handlers::listing_handlers;
use models::listing::ListingRequest;
use services::bucket_lister::BucketLister;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // --- Logging setup (stderr, stdout is reserved for the listing) ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // --- Parse config ---
    let cfg = AppConfig::from_env_and_args()?;
    tracing::debug!("Starting bucket-lister with config: {:?}", cfg);

    // --- Build client ---
    let lister = BucketLister::connect(&cfg.region).await?;

    // --- Run ---
    match &cfg.action {
        Action::List => {
            let request = ListingRequest::new(cfg.bucket.clone(), cfg.region.clone());
            let mut stdout = io::stdout().lock();
            listing_handlers::list_objects(&lister, &request, cfg.format, &mut stdout).await?;
        }
        Action::Download { key, dest } => {
            listing_handlers::download_object(&lister, &cfg.bucket, key, dest).await?;
        }
    }

    Ok(())
}
