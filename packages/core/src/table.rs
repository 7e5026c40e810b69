//! Step tables
//!
//! Gherkin data tables arrive as rows of cells with the header in the first
//! row:
//!
//! ```text
//! | name         | value            |
//! | Content-Type | application/json |
//! ```

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(mut rows: Vec<Vec<String>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(CoreError::InvalidTable("table has no header row".into()));
        }
        let headers: Vec<String> = rows
            .remove(0)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(CoreError::InvalidTable(format!(
                "row {} has {} cells, header has {}",
                index + 1,
                row.len(),
                headers.len()
            )));
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as ordered `(header, cell)` pairs.
    pub fn rows_as_maps(&self) -> Vec<Vec<(&str, &str)>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect()
    }

    /// Cell of `row` under `header`, if the column exists.
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let column = self.headers.iter().position(|h| h == header)?;
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Cell of `row` under `header`, failing when the column is missing.
    pub fn required(&self, row: usize, header: &str) -> Result<&str> {
        self.cell(row, header).ok_or_else(|| {
            CoreError::InvalidTable(format!("missing required column '{header}'"))
        })
    }

    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let column = self.headers.iter().position(|h| h == header)?;
        Some(self.rows.iter().map(|row| row[column].as_str()).collect())
    }
}
