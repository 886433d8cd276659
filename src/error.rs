use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures that stop a run before any hostname is scanned.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("input file '{path}' could not be read: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input file '{0}' contains no hostnames")]
    EmptyInput(PathBuf),
    #[error("fingerprint file '{path}' could not be read: {source}")]
    FingerprintRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fingerprint file '{path}' is malformed: {source}")]
    FingerprintParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid nameserver address '{0}'")]
    Nameserver(String),
    #[error("invalid delay {0}: must be a finite, non-negative number of seconds")]
    Delay(f64),
    #[error("resolver setup failed: {0}")]
    Resolver(#[from] trust_dns_resolver::error::ResolveError),
    #[error("http client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("report output failed: {0}")]
    Report(#[from] std::io::Error),
    #[error("csv output failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json output failed: {0}")]
    Json(#[from] serde_json::Error),
}
