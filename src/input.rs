use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SetupError;

/// Loads hostnames one per line. Blank lines are skipped, duplicates kept.
pub fn load_hostnames(path: &Path) -> Result<Vec<String>, SetupError> {
    let to_err = |source| SetupError::Input {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(to_err)?;
    let mut hostnames = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(to_err)?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            hostnames.push(trimmed.to_string());
        }
    }

    if hostnames.is_empty() {
        return Err(SetupError::EmptyInput(path.to_path_buf()));
    }
    Ok(hostnames)
}
