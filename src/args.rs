use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{delay_from_secs, load_fingerprints, ScanConfig};
use crate::constants::{parse_keywords, DEFAULT_KEYWORDS, FINGERPRINTS};
use crate::error::SetupError;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Dangling CNAME / subdomain takeover scanner", long_about = None)]
pub struct Args {
    /// Input file with one subdomain per line
    #[arg(short, long)]
    pub file: PathBuf,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 10)]
    pub threads: usize,

    /// Delay in seconds each worker waits after a subdomain's requests
    #[arg(long, default_value_t = 0.0)]
    pub delay: f64,

    /// DNS and HTTP timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Comma separated substrings that flag a CNAME target
    #[arg(long, default_value = DEFAULT_KEYWORDS)]
    pub takeover_keywords: String,

    /// JSON file replacing the built-in service fingerprint table
    #[arg(long)]
    pub fingerprints: Option<PathBuf>,

    /// Query this nameserver (ip:port) instead of the system resolver
    #[arg(long)]
    pub nameserver: Option<String>,

    /// Directory receiving the reports
    #[arg(short, long, default_value = "results")]
    pub output_dir: PathBuf,

    /// Skip the startup banner
    #[arg(long)]
    pub no_banner: bool,
}

impl Args {
    pub fn scan_config(&self) -> Result<ScanConfig, SetupError> {
        let fingerprints = match &self.fingerprints {
            Some(path) => load_fingerprints(path)?,
            None => FINGERPRINTS.clone(),
        };

        Ok(ScanConfig {
            workers: self.threads.max(1),
            timeout: Duration::from_secs(self.timeout),
            delay: delay_from_secs(self.delay)?,
            verbose: self.verbose,
            keywords: parse_keywords(&self.takeover_keywords),
            fingerprints,
        })
    }

    pub fn nameserver_addr(&self) -> Result<Option<SocketAddr>, SetupError> {
        self.nameserver
            .as_deref()
            .map(|ns| {
                ns.parse::<SocketAddr>()
                    .map_err(|_| SetupError::Nameserver(ns.to_string()))
            })
            .transpose()
    }
}
