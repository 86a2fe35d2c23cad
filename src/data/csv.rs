//! CSV reader for labelled dense data
//!
//! - The last column is the label, kept as a string
//! - All other columns are numeric features
//! - A header row is detected automatically
//! - Blank lines and lines starting with `#` are skipped

use crate::core::{Dataset, Result, SVMError, Sample};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load a labelled dataset from a CSV file
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset<String>> {
    let file = File::open(path)?;
    read_csv(BufReader::new(file))
}

/// Read a labelled dataset from any buffered reader
pub fn read_csv<R: BufRead>(reader: R) -> Result<Dataset<String>> {
    let mut samples = Vec::new();
    let mut seen_data_or_header = false;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !seen_data_or_header {
            seen_data_or_header = true;
            if is_header_line(line) {
                continue;
            }
        }

        samples.push(parse_data_line(line, line_no + 1)?);
    }

    if samples.is_empty() {
        return Err(SVMError::EmptyDataset);
    }
    Dataset::new(samples)
}

/// Most feature columns fail to parse as numbers
fn is_header_line(line: &str) -> bool {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 2 {
        return false;
    }
    let features = &fields[..fields.len() - 1];
    let non_numeric = features
        .iter()
        .filter(|field| unquote(field).parse::<f64>().is_err())
        .count();
    non_numeric * 2 > features.len()
}

fn parse_data_line(line: &str, line_no: usize) -> Result<Sample<String>> {
    let fields: Vec<&str> = line.split(',').map(unquote).collect();
    let Some((label, features)) = fields.split_last() else {
        return Err(SVMError::ParseError(format!("Line {line_no} is empty")));
    };
    if features.is_empty() {
        return Err(SVMError::ParseError(format!(
            "Line {line_no} has too few fields: {line}"
        )));
    }
    if label.is_empty() {
        return Err(SVMError::ParseError(format!("Line {line_no} has an empty label")));
    }

    let values = features
        .iter()
        .enumerate()
        .map(|(col, field)| match field.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(SVMError::ParseError(format!(
                "Invalid feature value at line {line_no}, column {}: {field}",
                col + 1
            ))),
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Sample::new(values, label.to_string()))
}

fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}
