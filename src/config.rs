use crate::models::listing::{DEFAULT_BUCKET, DEFAULT_REGION};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::{env, path::PathBuf};

/// Object fetched by `download` when no key is given.
pub const DEFAULT_DOWNLOAD_KEY: &str =
    "1000G_2504_high_coverage/additional_698_related/data/ERR3988763/HG00418.final.cram";

/// Local file written by `download` when no destination is given.
pub const DEFAULT_DOWNLOAD_DEST: &str = "cram.cram";

/// How a listing is written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The raw service reply, pretty-printed.
    #[default]
    Debug,
    /// A JSON document of the reply's entries.
    Json,
}

/// What the run does once the client exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Download { key: String, dest: PathBuf },
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bucket: String,
    pub region: String,
    pub format: OutputFormat,
    pub action: Action,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "List (or fetch from) a public S3 bucket")]
pub struct Args {
    /// Bucket to read (overrides BUCKET_LISTER_BUCKET)
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// Region the bucket lives in (overrides BUCKET_LISTER_REGION)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Output format for listings (overrides BUCKET_LISTER_FORMAT)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a single object to a local file, overwriting it
    Download {
        /// Object key to fetch
        #[arg(long, default_value = DEFAULT_DOWNLOAD_KEY)]
        key: String,

        /// Destination path
        #[arg(long, default_value = DEFAULT_DOWNLOAD_DEST)]
        dest: PathBuf,
    },
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::resolve(Args::parse(), |name| env::var(name))
    }

    /// Merge parsed arguments with whatever `lookup` finds for the
    /// `BUCKET_LISTER_*` variables. Arguments win, then env, then defaults.
    pub fn resolve<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let read = |name: &str| -> Result<Option<String>> {
            match lookup(name) {
                Ok(value) => Ok(Some(value)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(err) => Err(err).with_context(|| format!("reading {}", name)),
            }
        };

        let env_bucket = read("BUCKET_LISTER_BUCKET")?.unwrap_or_else(|| DEFAULT_BUCKET.into());
        let env_region = read("BUCKET_LISTER_REGION")?.unwrap_or_else(|| DEFAULT_REGION.into());
        let env_format = match read("BUCKET_LISTER_FORMAT")? {
            Some(value) => <OutputFormat as ValueEnum>::from_str(&value, true)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("parsing BUCKET_LISTER_FORMAT value `{}`", value))?,
            None => OutputFormat::default(),
        };

        let action = match args.command {
            None => Action::List,
            Some(Command::Download { key, dest }) => Action::Download { key, dest },
        };

        Ok(Self {
            bucket: args.bucket.unwrap_or(env_bucket),
            region: args.region.unwrap_or(env_region),
            format: args.format.unwrap_or(env_format),
            action,
        })
    }
}
