use std::path::Path;

use colored::*;

use crate::config::ScanConfig;
use crate::reporting::{ReportPaths, Summary};
use crate::scan::ScanResult;

pub fn print_banner() {
    println!(
        "{}",
        r#"
    ____                    __
   / __ \____ _____  ____ _/ /__  ______________ _____
  / / / / __ `/ __ \/ __ `/ / _ \/ ___/ ___/ __ `/ __ \
 / /_/ / /_/ / / / / /_/ / /  __(__  ) /__/ /_/ / / / /
/_____/\__,_/_/ /_/\__, /_/\___/____/\___/\__,_/_/ /_/
                  /____/
"#
        .blue()
        .bold()
    );
    println!("       {}\n", "dangling CNAME finder".cyan());
}

pub fn print_config(config: &ScanConfig, input: &Path, loaded: usize) {
    println!("[INFO] Loaded {} subdomains from: {}", loaded, input.display());
    println!(
        "[INFO] Starting scan with {} workers (timeout {}s, delay {:.2}s, {} fingerprints, {} keywords)...\n",
        config.workers,
        config.timeout.as_secs(),
        config.delay.as_secs_f64(),
        config.fingerprints.len(),
        config.keywords.len()
    );
}

fn status_text(status: Option<u16>) -> ColoredString {
    match status {
        None => "None".cyan(),
        Some(code @ 200..=299) => code.to_string().green(),
        Some(code @ 300..=399) => code.to_string().yellow(),
        Some(code) => code.to_string().red(),
    }
}

pub fn status_line(result: &ScanResult) -> String {
    let cname = match &result.cname {
        Some(c) => format!("CNAME: {}", c.green()),
        None => "No CNAME".to_string(),
    };
    let ips = result
        .addresses
        .as_ref()
        .map(|ips| format!(" IPs: {}", ips.join(", ")))
        .unwrap_or_default();
    let final_url = result
        .final_url
        .as_ref()
        .map(|u| format!(" | Final URL: {}", u))
        .unwrap_or_default();

    let line = format!(
        "{} → {}{} | Status: {}{}",
        result.hostname,
        cname,
        ips,
        status_text(result.http_status),
        final_url
    );
    if result.takeover_risk {
        format!("{} {}", "[TAKEOVER]".red().bold(), line)
    } else {
        line
    }
}

pub fn print_result(result: &ScanResult) {
    println!("{}", status_line(result));
}

pub fn print_summary(summary: &Summary, paths: &ReportPaths, started: &str) {
    println!();
    println!("{}", "────────────── SUMMARY ──────────────".cyan());
    println!("Scan started: {}", started);
    println!("Total subdomains scanned: {}", summary.total);
    println!("CNAME found: {}", summary.with_cname.to_string().green());
    println!("No CNAME: {}", summary.without_cname.to_string().yellow());
    println!(
        "Takeover risk (any status): {}",
        summary.takeover_risk.to_string().red()
    );
    println!(
        "Takeover risk (200 HTTP): {}",
        summary.takeover_200.to_string().red()
    );
    println!("Dangerous output saved: {}", paths.danger.display());
    println!("Full CSV saved: {}", paths.csv.display());
    println!("JSON saved: {}", paths.json.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_plain() {
        colored::control::set_override(false);
        let mut result = ScanResult::unresolved("a.example.com");
        result.http_status = Some(301);
        result.final_url = Some("https://www.example.com/".into());

        assert_eq!(
            status_line(&result),
            "a.example.com → No CNAME | Status: 301 | Final URL: https://www.example.com/"
        );
    }

    #[test]
    fn test_status_line_takeover() {
        colored::control::set_override(false);
        let mut result = ScanResult::unresolved("b.example.com");
        result.cname = Some("b.github.io".into());
        result.takeover_risk = true;

        assert_eq!(
            status_line(&result),
            "[TAKEOVER] b.example.com → CNAME: b.github.io | Status: None"
        );
    }
}
