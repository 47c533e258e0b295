//! CSV loading for already-preprocessed numeric datasets.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: first row is a header if it contains
//!   any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded commas are handled correctly
//!
//! Label modes:
//! - `ClassIndex`: the last column is an integer class index (0-based),
//!   one-hot encoded into a vector of length `n_classes`.
//! - `OneHot`: the last `n_label_cols` columns are floats forming the label.

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Last column is an integer class index; one-hot encode to `n_classes`.
    ClassIndex { n_classes: usize },
    /// Last `n_label_cols` columns are the label vector.
    OneHot { n_label_cols: usize },
}

/// Reads and parses a CSV file. See [`parse_csv`].
pub fn load_csv(path: &str, label_mode: LabelMode) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text, label_mode)
}

/// Parses CSV text into a dataset. Every row must carry the same number of
/// feature cells.
pub fn parse_csv(text: &str, label_mode: LabelMode) -> Result<Dataset> {
    let mut lines = text.lines().peekable();

    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut inputs: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<Vec<f64>> = Vec::new();

    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row_num = row_idx + 1;
        let cells = parse_csv_row(line);

        let (feats, label) = match label_mode {
            LabelMode::ClassIndex { n_classes } => split_class_index(&cells, n_classes, row_num)?,
            LabelMode::OneHot { n_label_cols } => split_one_hot(&cells, n_label_cols, row_num)?,
        };
        inputs.push(feats);
        labels.push(label);
    }

    if inputs.is_empty() {
        return Err(Error::InvalidData("CSV contains no data rows after parsing".into()));
    }

    // Matrix::from_rows rejects rows whose feature count differs from the first.
    Dataset::from_rows(inputs, labels)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn split_class_index(cells: &[String], n_classes: usize, row_num: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let (label_cell, feature_cells) = match cells.split_last() {
        Some((last, rest)) if !rest.is_empty() => (last, rest),
        _ => {
            return Err(Error::InvalidData(format!(
                "row {row_num}: expected at least 2 columns (features + class index), got {}",
                cells.len()
            )))
        }
    };

    let feats = parse_floats(feature_cells, row_num)?;
    let class_idx: usize = label_cell.trim().parse().map_err(|_| {
        Error::InvalidData(format!(
            "row {row_num}: class index '{label_cell}' is not a non-negative integer"
        ))
    })?;
    if class_idx >= n_classes {
        return Err(Error::InvalidData(format!(
            "row {row_num}: class index {class_idx} >= n_classes {n_classes}"
        )));
    }
    let mut one_hot = vec![0.0f64; n_classes];
    one_hot[class_idx] = 1.0;
    Ok((feats, one_hot))
}

fn split_one_hot(cells: &[String], n_label_cols: usize, row_num: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    if cells.len() < n_label_cols + 1 {
        return Err(Error::InvalidData(format!(
            "row {row_num}: expected at least {} columns, got {}",
            n_label_cols + 1,
            cells.len()
        )));
    }
    let split = cells.len() - n_label_cols;
    let feats = parse_floats(&cells[..split], row_num)?;
    let label = parse_floats(&cells[split..], row_num)?;
    Ok((feats, label))
}

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    parse_csv_row(line).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row_num: usize) -> Result<Vec<f64>> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| {
                Error::InvalidData(format!("row {row_num}: '{c}' is not a valid number"))
            })
        })
        .collect()
}
