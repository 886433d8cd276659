use std::path::Path;
use std::time::Duration;

use crate::constants::{
    parse_keywords, Fingerprint, DEFAULT_DELAY, DEFAULT_KEYWORDS, DEFAULT_TIMEOUT,
    DEFAULT_WORKERS, FINGERPRINTS,
};
use crate::error::SetupError;
use crate::takeover::Classifier;

/// Settings the scan engine consumes.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub workers: usize,
    /// Bound on each DNS query and each HTTP attempt.
    pub timeout: Duration,
    /// Pause taken by a worker after the network steps of every hostname.
    pub delay: Duration,
    pub verbose: bool,
    pub keywords: Vec<String>,
    pub fingerprints: Vec<Fingerprint>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
            verbose: false,
            keywords: parse_keywords(DEFAULT_KEYWORDS),
            fingerprints: FINGERPRINTS.clone(),
        }
    }
}

impl ScanConfig {
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.keywords.clone(), self.fingerprints.clone())
    }
}

/// Reads an ordered JSON array of `{"service": .., "pattern": ..}` entries.
pub fn load_fingerprints(path: &Path) -> Result<Vec<Fingerprint>, SetupError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SetupError::FingerprintRead {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: Vec<Fingerprint> =
        serde_json::from_str(&raw).map_err(|source| SetupError::FingerprintParse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(entries
        .into_iter()
        .map(|fp| Fingerprint::new(fp.service, fp.pattern))
        .collect())
}

/// Converts a delay in seconds, rejecting negative or non-finite values.
pub fn delay_from_secs(secs: f64) -> Result<Duration, SetupError> {
    Duration::try_from_secs_f64(secs).map_err(|_| SetupError::Delay(secs))
}
