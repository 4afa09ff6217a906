//! Parser for delimited rating files.
//!
//! Each non-empty line holds `user<sep>item[<sep>rating[<sep>timestamp]]`.
//! The separator setting is a set of characters, any of which splits
//! fields; runs of separators count as one.

use crate::error::{DataModelError, Result};
use crate::types::Rating;
use std::fs;
use std::path::Path;

/// Character set used to split fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separators(Vec<char>);

impl Separators {
    /// Builds the set from a config value. A literal `\t` means tab.
    pub fn parse(raw: &str) -> Self {
        let expanded = raw.replace("\\t", "\t");
        let mut chars: Vec<char> = expanded.chars().collect();
        if chars.is_empty() {
            chars.push(',');
        }
        Self(chars)
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        line.split(|c| self.0.contains(&c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for Separators {
    fn default() -> Self {
        Self(vec![','])
    }
}

/// Reads a file as UTF-8, falling back to Latin-1 for legacy datasets
fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DataModelError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => Ok(e.into_bytes().iter().map(|&b| b as char).collect()),
    }
}

/// Parse every rating in a file
pub fn parse_ratings(path: &Path, separators: &Separators) -> Result<Vec<Rating>> {
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content = read_text(path)?;

    let mut ratings = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        ratings.push(parse_line(line, idx + 1, &file, separators)?);
    }

    tracing::debug!("Parsed {} ratings from {}", ratings.len(), file);
    Ok(ratings)
}

fn parse_line(line: &str, line_no: usize, file: &str, separators: &Separators) -> Result<Rating> {
    let parts = separators.split(line);
    if parts.len() < 2 {
        return Err(DataModelError::FieldCountMismatch {
            expected: 2,
            found: parts.len(),
            line: line_no,
        });
    }

    let value = match parts.get(2) {
        Some(raw) => raw.parse::<f64>().map_err(|e| DataModelError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: format!("Invalid rating '{}': {}", raw, e),
        })?,
        None => 1.0,
    };
    if !value.is_finite() {
        return Err(DataModelError::InvalidValue {
            field: "rating".to_string(),
            value: value.to_string(),
        });
    }

    let timestamp = parts
        .get(3)
        .map(|raw| {
            raw.parse::<i64>().map_err(|e| DataModelError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid timestamp '{}': {}", raw, e),
            })
        })
        .transpose()?;

    Ok(Rating {
        user_id: parts[0].to_string(),
        item_id: parts[1].to_string(),
        value,
        timestamp,
    })
}
