pub mod args;
pub mod config;
mod console;
pub mod constants;
pub mod dns;
pub mod error;
pub mod input;
pub mod probe;
pub mod reporting;
pub mod scan;
pub mod takeover;

pub use args::Args;
pub use config::ScanConfig;
pub use error::{BoxError, SetupError};
pub use reporting::{ReportPaths, Summary};
pub use scan::{ResultSet, ScanResult, Scanner, Stage};
pub use takeover::{Classifier, Trigger, Verdict};

use std::sync::Arc;

use chrono::Local;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dns::{create_resolver, DnsLookup, DnsResolver};
use input::load_hostnames;
use probe::{build_client, HttpProbe, HttpProber};
use reporting::write_outputs;

/// Installs the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "danglescan=debug" } else { "danglescan=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub async fn run(args: Args) -> Result<Summary, BoxError> {
    let started = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let config = args.scan_config()?;

    if !args.no_banner {
        console::print_banner();
    }

    let hostnames = load_hostnames(&args.file)?;
    console::print_config(&config, &args.file, hostnames.len());

    let resolver = create_resolver(args.nameserver_addr()?, config.timeout)?;
    let dns: Arc<dyn DnsLookup> = Arc::new(DnsResolver::new(resolver, config.timeout));
    let client = build_client(config.timeout)?;
    let prober: Arc<dyn HttpProbe> = Arc::new(HttpProber::new(client, config.timeout));

    let scanner = Scanner::new(&config, dns, prober);
    let results = scanner.run_with(hostnames, console::print_result).await;

    let paths = write_outputs(&results, &args.output_dir)?;
    let summary = Summary::from_results(&results);
    info!("Wrote {} rows to {}", summary.total, paths.csv.display());
    console::print_summary(&summary, &paths, &started);

    Ok(summary)
}
