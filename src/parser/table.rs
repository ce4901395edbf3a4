use crate::domain::{CellValue, SourceRow};
use std::collections::HashMap;
use std::iter::Enumerate;
use std::str::Lines;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("The CSV file is empty")]
    Empty,
    #[error("No data rows found after the header")]
    HeaderOnly,
    #[error("Line {line}: missing value for identifier column '{column}'")]
    MissingIdentifier { line: usize, column: String },
}

/// Split a header line into column names: comma-separated, trimmed, quotes stripped.
pub fn parse_header(line: &str) -> Vec<String> {
    line.split(',')
        .map(|col| col.trim().replace(['"', '\''], ""))
        .collect()
}

/// First non-blank line of `text`, if any.
pub fn header_line(text: &str) -> Option<&str> {
    text.lines().find(|line| !line.trim().is_empty())
}

/// A parsed upload: the header plus a restartable view over the data lines.
///
/// Rows are produced lazily from the borrowed text; calling [`Table::rows`]
/// again starts over and yields the same sequence.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    text: &'a str,
    headers: Vec<String>,
    header_index: usize,
    id_column: String,
    id_index: Option<usize>,
}

impl<'a> Table<'a> {
    /// Parse the header of `text` and check that at least one data line follows.
    /// The identifier column is matched exactly.
    pub fn load(text: &'a str, id_column: &str) -> Result<Self, ParseError> {
        Self::load_with_case(text, id_column, true)
    }

    /// Like [`Table::load`], with `case_sensitive = false` matching the
    /// identifier column regardless of ASCII case.
    pub fn load_with_case(
        text: &'a str,
        id_column: &str,
        case_sensitive: bool,
    ) -> Result<Self, ParseError> {
        let mut non_blank = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((header_index, header)) = non_blank.next() else {
            return Err(ParseError::Empty);
        };
        if non_blank.next().is_none() {
            return Err(ParseError::HeaderOnly);
        }

        let headers = parse_header(header);
        let id_index = headers.iter().position(|h| {
            if case_sensitive {
                h == id_column
            } else {
                h.eq_ignore_ascii_case(id_column)
            }
        });

        Ok(Self {
            text,
            headers,
            header_index,
            id_column: id_column.to_string(),
            id_index,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn rows(&self) -> Rows<'_, 'a> {
        Rows {
            table: self,
            lines: self.text.lines().enumerate(),
        }
    }

    /// Materialize every row, stopping at the first malformed one.
    pub fn collect_rows(&self) -> Result<Vec<SourceRow>, ParseError> {
        self.rows().collect()
    }

    fn build_row(&self, line_no: usize, line: &str) -> Result<SourceRow, ParseError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let id = self
            .id_index
            .and_then(|idx| fields.get(idx))
            .filter(|field| !field.is_empty())
            .ok_or_else(|| ParseError::MissingIdentifier {
                line: line_no,
                column: self.id_column.clone(),
            })?
            .to_string();

        // Positional match; short rows leave trailing columns absent.
        let values: HashMap<String, CellValue> = self
            .headers
            .iter()
            .zip(fields.iter())
            .map(|(header, field)| (header.clone(), CellValue::coerce(field)))
            .collect();

        Ok(SourceRow {
            id,
            line: line_no,
            values,
        })
    }
}

/// Lazy iterator over the data rows of a [`Table`].
pub struct Rows<'t, 'a> {
    table: &'t Table<'a>,
    lines: Enumerate<Lines<'a>>,
}

impl Iterator for Rows<'_, '_> {
    type Item = Result<SourceRow, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            if idx <= self.table.header_index || line.trim().is_empty() {
                continue;
            }
            return Some(self.table.build_row(idx + 1, line));
        }
        None
    }
}
