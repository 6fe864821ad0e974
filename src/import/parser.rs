//! CSV text -> header row + string rows
//!
//! Reader configuration matches the export side: standard double-quote
//! escaping, flexible row lengths (no column-count validation here; later
//! stages index defensively and treat missing cells as empty), cells
//! trimmed. An input with no header row is the fatal "empty CSV" condition,
//! never a valid zero-row import.

use csv::ReaderBuilder;

use super::ImportError;

/// A fully parsed CSV document
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of a source header, exact match
    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Parse raw CSV text
pub fn parse(text: &str) -> Result<CsvTable, ImportError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| ImportError::Parse {
            row: 1,
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::EmptyCsv);
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        // +2: 1-indexed plus the header row
        let record = result.map_err(|e| ImportError::Parse {
            row: idx + 2,
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(CsvTable { headers, rows })
}
