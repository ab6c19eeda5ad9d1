//! Building tables from flat sample rows.
//!
//! A sample file has one sample per line: the `DIM` coordinates, outermost
//! first, followed by the value. Fields are separated by whitespace and/or
//! commas. Blank lines and lines starting with `#` are skipped.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use log::{debug, warn};
use thiserror::Error;

use crate::table::{LookupError, Table};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Could not read samples")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: {text:?} is not a number")]
    BadNumber { line: usize, text: String },

    #[error("Invalid point {text:?}")]
    BadPoint { text: String },

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
}

/// Parses sample rows into a fresh table. Rows repeating an already stored
/// point are skipped.
pub fn parse_samples<T>(text: &str) -> Result<T, SampleError>
where
    T: Table,
    T::Key: FromStr,
    T::Value: FromStr,
{
    let mut table = T::default();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let row = fields(trimmed).collect_vec();
        if row.len() != T::DIM + 1 {
            return Err(SampleError::ColumnCount {
                line: line_number,
                expected: T::DIM + 1,
                found: row.len(),
            });
        }

        let (value_text, coordinates) = match row.split_last() {
            Some(split) => split,
            None => continue,
        };
        let point = coordinates
            .iter()
            .map(|text| parse_number(text, line_number))
            .collect::<Result<Vec<T::Key>, _>>()?;
        let value = parse_number(value_text, line_number)?;

        if !table.insert_point(&point, value)? {
            warn!("line {}: duplicate sample ignored", line_number);
        }
    }
    debug!("loaded {} outer entries", table.len());
    Ok(table)
}

pub fn read_samples<T, P>(path: P) -> Result<T, SampleError>
where
    T: Table,
    T::Key: FromStr,
    T::Value: FromStr,
    P: AsRef<Path>,
{
    let text = fs::read_to_string(path)?;
    parse_samples(&text)
}

/// Parses a query point such as `"1.5,2"` or `"1.5 2"`.
pub fn parse_point<K: FromStr>(text: &str) -> Result<Vec<K>, SampleError> {
    let point = fields(text)
        .map(K::from_str)
        .collect::<Result<Vec<K>, _>>()
        .map_err(|_| SampleError::BadPoint {
            text: text.to_owned(),
        })?;
    if point.is_empty() {
        return Err(SampleError::BadPoint {
            text: text.to_owned(),
        });
    }
    Ok(point)
}

fn parse_number<N: FromStr>(text: &str, line: usize) -> Result<N, SampleError> {
    text.parse().map_err(|_| SampleError::BadNumber {
        line,
        text: text.to_owned(),
    })
}
