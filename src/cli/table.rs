//! Table formatting utilities for CLI list commands
//!
//! One table system shared by the entity list commands: typed cells with
//! color coding for terminals, plain CSV for piping into spreadsheets, and
//! bare IDs for scripting.

use chrono::{DateTime, NaiveDate, Utc};
use console::style;

use crate::cli::helpers::{escape_csv, format_short_id, truncate_str};
use crate::cli::OutputFormat;
use crate::core::entity::ServiceGroup;
use crate::entities::{ConvertFollowUp, VisitorFollowUp};

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Record ID (truncated, cyan)
    Id(String),
    /// Plain text, truncated to the column
    Text(String),
    /// Service cohort with color coding
    Service(ServiceGroup),
    /// Visitor follow-up status with color coding
    VisitorStatus(VisitorFollowUp),
    /// Convert follow-up status with color coding
    ConvertStatus(ConvertFollowUp),
    /// Date only
    Date(NaiveDate),
    /// Timestamp displayed as date only
    Timestamp(DateTime<Utc>),
    /// Numeric value, right aligned
    Number(i64),
    /// Tags as comma-separated text
    Tags(Vec<String>),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Get raw string value (no styling)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.clone(),
            CellValue::Text(s) => s.clone(),
            CellValue::Service(g) => g.to_string(),
            CellValue::VisitorStatus(s) => s.to_string(),
            CellValue::ConvertStatus(s) => s.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Timestamp(ts) => ts.format("%Y-%m-%d").to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Tags(tags) => tags.join(", "),
            CellValue::Empty => String::new(),
        }
    }

    /// Format for aligned terminal output (with colors)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => {
                format!("{:<width$}", style(format_short_id(id)).cyan(), width = width)
            }
            CellValue::Text(s) => {
                format!(
                    "{:<width$}",
                    truncate_str(s, width.saturating_sub(2)),
                    width = width
                )
            }
            CellValue::Service(group) => {
                let s = group.to_string();
                let styled = match group {
                    ServiceGroup::Children => style(&s).magenta(),
                    ServiceGroup::Teens => style(&s).cyan(),
                    ServiceGroup::Youth => style(&s).blue(),
                    ServiceGroup::Adults => style(&s).white(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::VisitorStatus(status) => {
                let s = status.to_string();
                let styled = match status {
                    VisitorFollowUp::Pending => style(&s).yellow(),
                    VisitorFollowUp::Contacted => style(&s).cyan(),
                    VisitorFollowUp::Converted => style(&s).green(),
                    VisitorFollowUp::Member => style(&s).green().bold(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::ConvertStatus(status) => {
                let s = status.to_string();
                let styled = match status {
                    ConvertFollowUp::Pending => style(&s).yellow(),
                    ConvertFollowUp::Contacted => style(&s).cyan(),
                    ConvertFollowUp::Discipled => style(&s).green(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Date(_) | CellValue::Timestamp(_) => {
                format!("{:<width$}", self.raw(), width = width)
            }
            CellValue::Number(n) => format!("{:>width$}", n, width = width),
            CellValue::Tags(tags) => {
                let joined = tags.join(", ");
                format!(
                    "{:<width$}",
                    truncate_str(&joined, width.saturating_sub(2)),
                    width = width
                )
            }
            CellValue::Empty => format!("{:<width$}", "-", width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            other => escape_csv(&other.raw()),
        }
    }

    /// Display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Id(id) => format_short_id(id).len(),
            CellValue::Date(_) | CellValue::Timestamp(_) => 10,
            CellValue::Empty => 1,
            other => other.raw().len(),
        }
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    pub full_id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(full_id: String) -> Self {
        Self {
            full_id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in the selected format
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            show_summary: true,
        }
    }

    /// Disable the trailing summary line (for piping)
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Output rows in the specified format
    pub fn output(&self, rows: Vec<TableRow>, format: OutputFormat) {
        match format {
            OutputFormat::Tsv => self.output_tsv(&rows),
            OutputFormat::Csv => self.output_csv(&rows),
            OutputFormat::Id => {
                for row in &rows {
                    println!("{}", row.full_id);
                }
            }
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                col.header
                    .len()
                    .max(max_content.saturating_add(2))
                    .min(col.width)
            })
            .collect()
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let header_parts: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = w))
            .collect();
        println!("{}", header_parts.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let parts: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => format!("{:<width$}", "-", width = w),
                })
                .collect();
            println!("{}", parts.join(" "));
        }

        if self.show_summary {
            println!();
            println!(
                "{} {}(s) found.",
                style(rows.len()).cyan(),
                self.entity_name
            );
        }
    }

    fn output_csv(&self, rows: &[TableRow]) {
        let headers: Vec<String> = self
            .columns
            .iter()
            .map(|col| col.key.to_string())
            .collect();
        println!("{}", headers.join(","));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| {
                    row.get(col.key)
                        .map(|v| v.format_csv())
                        .unwrap_or_default()
                })
                .collect();
            println!("{}", values.join(","));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_text() {
        let cell = CellValue::Text("Hello World".to_string());
        assert!(cell.format_tsv(20).contains("Hello World"));
        assert_eq!(cell.format_csv(), "Hello World");
    }

    #[test]
    fn test_cell_value_service_csv() {
        let cell = CellValue::Service(ServiceGroup::Children);
        assert_eq!(cell.format_csv(), "children");
    }

    #[test]
    fn test_cell_value_tags_csv_escapes() {
        let cell = CellValue::Tags(vec!["choir".to_string(), "media".to_string()]);
        assert_eq!(cell.format_csv(), "\"choir, media\"");
    }

    #[test]
    fn test_table_row_builder() {
        let row = TableRow::new("MBR-123".to_string())
            .cell("name", CellValue::Text("Mary".to_string()))
            .cell("group", CellValue::Service(ServiceGroup::Adults));

        assert_eq!(row.full_id, "MBR-123");
        assert!(row.get("name").is_some());
        assert!(row.get("missing").is_none());
    }
}
