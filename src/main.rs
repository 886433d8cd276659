use clap::Parser;
use danglescan::{init_logging, run, Args};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("[ERROR] {}", e);
        std::process::exit(1);
    }
}
