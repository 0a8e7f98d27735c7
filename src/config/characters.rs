use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Read the tracked-character list: one name per line. Blank lines and
/// lines starting with `#` are ignored.
pub fn read_characters(path: &Path) -> AppResult<Vec<String>> {
    if !path.exists() {
        return Err(AppError::ConfigMissing(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let names = parse_characters(&content);

    if names.is_empty() {
        return Err(AppError::ConfigEmpty(path.to_path_buf()));
    }
    Ok(names)
}

pub fn parse_characters(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
