use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Writer;
use itertools::Itertools;
use serde::Serialize;

use crate::error::SetupError;
use crate::scan::{ResultSet, ScanResult};

pub const CSV_HEADER: [&str; 7] = [
    "Subdomain",
    "CNAME",
    "IPs",
    "HTTP Status",
    "Final URL",
    "Takeover",
    "Trigger",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub danger: PathBuf,
    pub csv: PathBuf,
    pub json: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub with_cname: usize,
    pub without_cname: usize,
    pub takeover_risk: usize,
    pub takeover_200: usize,
}

impl Summary {
    pub fn from_results(results: &ResultSet) -> Self {
        let total = results.len();
        let with_cname = results.iter().filter(|r| r.cname.is_some()).count();
        Self {
            total,
            with_cname,
            without_cname: total - with_cname,
            takeover_risk: results.iter().filter(|r| r.takeover_risk).count(),
            takeover_200: results.dangerous().count(),
        }
    }
}

/// `dir/base.ext`, or the first of `dir/base1.ext`, `dir/base2.ext`, ... that
/// does not exist yet.
pub fn versioned_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    let mut i = 0usize;
    loop {
        let name = if i == 0 {
            format!("{}.{}", base, ext)
        } else {
            format!("{}{}.{}", base, i, ext)
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

pub fn danger_line(result: &ScanResult) -> String {
    format!(
        "{} → {} | Status: {} | Final URL: {}",
        result.hostname,
        result.cname.as_deref().unwrap_or("None"),
        result
            .http_status
            .map_or_else(|| "None".to_string(), |s| s.to_string()),
        result.final_url.as_deref().unwrap_or("None"),
    )
}

pub fn csv_row(result: &ScanResult) -> [String; 7] {
    [
        result.hostname.clone(),
        result.cname.clone().unwrap_or_default(),
        result
            .addresses
            .as_ref()
            .map_or(String::new(), |ips| ips.iter().join(", ")),
        result
            .http_status
            .map_or(String::new(), |s| s.to_string()),
        result.final_url.clone().unwrap_or_default(),
        result.takeover_risk.to_string(),
        result
            .trigger
            .as_ref()
            .map_or(String::new(), |t| t.to_string()),
    ]
}

/// Writes risky hosts that answered 200, returning how many were written.
pub fn write_danger_report(path: &Path, results: &ResultSet) -> Result<usize, SetupError> {
    let mut file = BufWriter::new(File::create(path)?);
    let mut written = 0;
    for result in results.sorted().into_iter().filter(|r| r.is_dangerous()) {
        writeln!(file, "{}", danger_line(result))?;
        written += 1;
    }
    file.flush()?;
    Ok(written)
}

pub fn write_csv(path: &Path, results: &ResultSet) -> Result<(), SetupError> {
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(CSV_HEADER)?;
    for result in results.sorted() {
        wtr.write_record(csv_row(result))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json(path: &Path, results: &ResultSet) -> Result<(), SetupError> {
    let rows = results.sorted();
    std::fs::write(path, serde_json::to_string_pretty(&rows)?)?;
    Ok(())
}

pub fn write_outputs(results: &ResultSet, output_dir: &Path) -> Result<ReportPaths, SetupError> {
    std::fs::create_dir_all(output_dir)?;

    let paths = ReportPaths {
        danger: versioned_path(output_dir, "danger_only", "txt"),
        csv: versioned_path(output_dir, "all_results", "csv"),
        json: versioned_path(output_dir, "all_results", "json"),
    };

    write_danger_report(&paths.danger, results)?;
    write_csv(&paths.csv, results)?;
    write_json(&paths.json, results)?;

    Ok(paths)
}
