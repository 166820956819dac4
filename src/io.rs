//! Line-oriented edge lists.
//!
//! ```text
//! % comment
//! a b        weight 1
//! a c 2.5    explicit weight
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::{EdgeRecord, Graph};

/// Parse edge records from a reader.
///
/// Blank lines and lines starting with `%` are skipped. Each other line holds
/// two node ids and an optional non-negative weight.
pub fn parse_edge_list<R: BufRead>(reader: R) -> Result<Vec<EdgeRecord<String>>> {
    let mut records = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let record = match fields.as_slice() {
            [u, v] => EdgeRecord::new((*u).to_string(), (*v).to_string()),
            [u, v, w] => {
                let weight: f64 = w.parse().map_err(|_| {
                    Error::invalid_graph(format!("line {}: bad weight {w:?}", lineno + 1))
                })?;
                if !weight.is_finite() || weight < 0.0 {
                    return Err(Error::invalid_graph(format!(
                        "line {}: weight must be finite and non-negative, got {weight}",
                        lineno + 1
                    )));
                }
                EdgeRecord::weighted((*u).to_string(), (*v).to_string(), weight)
            }
            _ => {
                return Err(Error::invalid_graph(format!(
                    "line {}: expected 2 or 3 fields, found {}",
                    lineno + 1,
                    fields.len()
                )))
            }
        };
        records.push(record);
    }

    tracing::debug!(edges = records.len(), "parsed edge list");
    Ok(records)
}

/// Read edge records from a file.
pub fn read_edge_list(path: impl AsRef<Path>) -> Result<Vec<EdgeRecord<String>>> {
    let file = File::open(path)?;
    parse_edge_list(BufReader::new(file))
}

/// Read a file straight into a [`Graph`].
pub fn read_graph(path: impl AsRef<Path>) -> Result<Graph<String>> {
    Graph::from_edges(read_edge_list(path)?)
}
