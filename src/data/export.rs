use super::model::{CellValue, Table};
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub delimiter: u8,
    /// Write every number with two decimals, as shown on screen.
    pub round_numeric: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            round_numeric: false,
        }
    }
}

/// Serialize a table as UTF-8 delimited text: header row, then one record per row.
pub fn to_delimited_bytes(table: &Table, options: &ExportOptions) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(Vec::new());

    writer
        .write_record(table.column_names())
        .map_err(|e| EngineError::Export(e.to_string()))?;

    for row in 0..table.n_rows() {
        let record = table
            .columns()
            .iter()
            .map(|c| format_cell(&c.values[row], options.round_numeric));
        writer
            .write_record(record)
            .map_err(|e| EngineError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| EngineError::Export(e.to_string()))
}

/// Comma-separated export with default options.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    to_delimited_bytes(table, &ExportOptions::default())
}

fn format_cell(value: &CellValue, round_numeric: bool) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Integer(i) if round_numeric => format!("{:.2}", *i as f64),
        CellValue::Float(v) if round_numeric => format!("{v:.2}"),
        other => other.to_string(),
    }
}
