use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type,
    Int64Type, TimeUnit, TimestampMicrosecondType, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDateTime, NaiveTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::infer::parse_temporal;
use super::model::{CellValue, Column, Table};
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs that change how a source is turned into a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    /// Field delimiter for delimited text (ignored for `.tsv`, which is always tab).
    pub delimiter: u8,
    /// Strip surrounding whitespace from text cells before typing them.
    pub trim_text: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim_text: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.xlsb` / `.ods` – first worksheet, header row first
/// * `.parquet` / `.pq` – one column per field
/// * `.json` – `[{ "col": value, ... }, ...]`
/// * `.tsv` / `.tab` – tab-delimited text
/// * anything else – delimited text (comma unless configured otherwise)
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table, EngineError> {
    let raw = read_raw(path, options).map_err(|e| EngineError::UnreadableSource {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })?;

    let columns = raw
        .into_iter()
        .map(|(name, values)| Column::new(name, values))
        .collect();
    let table = Table::from_columns(columns)?;
    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.n_rows(),
        table.n_cols(),
        path.display()
    );
    Ok(table)
}

type RawColumns = Vec<(String, Vec<CellValue>)>;

fn read_raw(path: &Path, options: &LoadOptions) -> Result<RawColumns> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut raw = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => load_spreadsheet(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "tsv" | "tab" => load_delimited(path, b'\t', options.trim_text)?,
        _ => load_delimited(path, options.delimiter, options.trim_text)?,
    };

    if options.trim_text {
        for (_, values) in raw.iter_mut() {
            trim_text_cells(values);
        }
    }
    Ok(raw)
}

fn trim_text_cells(values: &mut [CellValue]) {
    for v in values.iter_mut() {
        if let CellValue::Text(s) = v {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
    }
}

/// Repair a header row: blank names become `Unnamed: {i}`, repeats get `.{n}`.
fn dedupe_headers(headers: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                h
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per row. Every cell is typed on
/// its own (after trimming, when asked); the column kind is settled afterwards.
fn load_delimited(path: &Path, delimiter: u8, trim: bool) -> Result<RawColumns> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .context("opening delimited text")?;
    let headers = dedupe_headers(
        reader
            .headers()
            .context("reading header row")?
            .iter()
            .map(|h| h.to_string()),
    );

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        for (col_idx, values) in columns.iter_mut().enumerate() {
            let field = record.get(col_idx).unwrap_or("");
            values.push(guess_cell_type(if trim { field.trim() } else { field }));
        }
    }

    Ok(headers.into_iter().zip(columns).collect())
}

const NA_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// Numbers may carry surrounding whitespace; text keeps it unless trimmed
/// beforehand.
fn guess_cell_type(s: &str) -> CellValue {
    if NA_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    let bare = s.trim();
    if let Ok(i) = bare.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = bare.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
        return CellValue::Bool(s.eq_ignore_ascii_case("true"));
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// First worksheet only; the first row is the header.
fn load_spreadsheet(path: &Path) -> Result<RawColumns> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers = dedupe_headers(header_row.iter().map(|c| match c {
        Data::Empty => String::new(),
        other => other.to_string(),
    }));

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col_idx, values) in columns.iter_mut().enumerate() {
            values.push(row.get(col_idx).map_or(CellValue::Null, sheet_cell));
        }
    }

    Ok(headers.into_iter().zip(columns).collect())
}

fn sheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        // Durations stay numeric, in days as stored.
        Data::DateTime(dt) if dt.is_duration() => CellValue::Float(dt.as_f64()),
        Data::DateTime(dt) => dt.as_datetime().map_or(CellValue::Null, datetime_cell),
        Data::DateTimeIso(s) => parse_temporal(s).unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            log::debug!("Spreadsheet cell error {e:?} read as missing");
            CellValue::Null
        }
    }
}

/// Spreadsheet timestamps at midnight are plain dates.
fn datetime_cell(dt: NaiveDateTime) -> CellValue {
    if dt.time() == NaiveTime::MIN {
        CellValue::Date(dt.date())
    } else {
        CellValue::DateTime(dt)
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Region": "North", "Sales": 10.5, "Date": "2024-01-01" },
///   ...
/// ]
/// ```
///
/// Columns appear in first-seen key order; absent keys read as missing.
fn load_json(path: &Path) -> Result<RawColumns> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<Vec<CellValue>> = Vec::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for (key, val) in obj {
            let col = *index.entry(key.clone()).or_insert_with(|| {
                names.push(key.clone());
                // Back-fill earlier rows that lacked this key.
                columns.push(vec![CellValue::Null; i]);
                columns.len() - 1
            });
            columns[col].push(json_to_cell(val));
        }
        for values in columns.iter_mut() {
            if values.len() == i {
                values.push(CellValue::Null);
            }
        }
    }

    Ok(names.into_iter().zip(columns).collect())
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file, one table column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawColumns> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, values) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            append_arrow_column(array, values)
                .with_context(|| format!("column '{}'", names[col_idx]))?;
        }
    }

    Ok(dedupe_headers(names).into_iter().zip(columns).collect())
}

/// Append every row of an Arrow column as cells.
fn append_arrow_column(col: &Arc<dyn Array>, out: &mut Vec<CellValue>) -> Result<()> {
    macro_rules! ints {
        ($t:ty) => {{
            let arr = col.as_primitive::<$t>();
            out.extend(arr.iter().map(|v| match v {
                Some(v) => CellValue::Integer(v as i64),
                None => CellValue::Null,
            }));
        }};
    }

    match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_string::<i32>();
            out.extend(arr.iter().map(|v| match v {
                Some(s) => CellValue::Text(s.to_string()),
                None => CellValue::Null,
            }));
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            out.extend(arr.iter().map(|v| match v {
                Some(s) => CellValue::Text(s.to_string()),
                None => CellValue::Null,
            }));
        }
        DataType::Int8 => ints!(Int8Type),
        DataType::Int16 => ints!(Int16Type),
        DataType::Int32 => ints!(Int32Type),
        DataType::Int64 => ints!(Int64Type),
        DataType::UInt8 => ints!(UInt8Type),
        DataType::UInt16 => ints!(UInt16Type),
        DataType::UInt32 => ints!(UInt32Type),
        DataType::UInt64 => ints!(UInt64Type),
        DataType::Float32 => {
            let arr = col.as_primitive::<Float32Type>();
            out.extend(arr.iter().map(|v| match v {
                Some(v) => CellValue::Float(v as f64),
                None => CellValue::Null,
            }));
        }
        DataType::Float64 => {
            let arr = col.as_primitive::<Float64Type>();
            out.extend(arr.iter().map(|v| match v {
                Some(v) => CellValue::Float(v),
                None => CellValue::Null,
            }));
        }
        DataType::Boolean => {
            let arr = col.as_boolean();
            out.extend(arr.iter().map(|v| match v {
                Some(b) => CellValue::Bool(b),
                None => CellValue::Null,
            }));
        }
        DataType::Date32 => {
            let arr = col.as_primitive::<Date32Type>();
            out.extend((0..arr.len()).map(|row| {
                match arr.is_valid(row).then(|| arr.value_as_date(row)).flatten() {
                    Some(d) => CellValue::Date(d),
                    None => CellValue::Null,
                }
            }));
        }
        DataType::Date64 => {
            let arr = col.as_primitive::<Date64Type>();
            out.extend((0..arr.len()).map(|row| {
                match arr.is_valid(row).then(|| arr.value_as_date(row)).flatten() {
                    Some(d) => CellValue::Date(d),
                    None => CellValue::Null,
                }
            }));
        }
        DataType::Timestamp(_, _) => {
            let micros = cast(col, &DataType::Timestamp(TimeUnit::Microsecond, None))
                .context("casting timestamp column")?;
            let arr = micros.as_primitive::<TimestampMicrosecondType>();
            out.extend((0..arr.len()).map(|row| {
                match arr.is_valid(row).then(|| arr.value_as_datetime(row)).flatten() {
                    Some(dt) => CellValue::DateTime(dt),
                    None => CellValue::Null,
                }
            }));
        }
        other => match cast(col, &DataType::Utf8) {
            Ok(as_text) => {
                let arr = as_text.as_string::<i32>();
                out.extend(arr.iter().map(|v| match v {
                    Some(s) => CellValue::Text(s.to_string()),
                    None => CellValue::Null,
                }));
            }
            Err(e) => {
                log::warn!("Column type {other:?} has no text form ({e}), read as missing");
                out.extend(std::iter::repeat(CellValue::Null).take(col.len()));
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use arrow::array::{Float64Array, Int64Array, StringArray, TimestampMillisecondArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;
    use parquet::arrow::ArrowWriter;
    use zip::write::FileOptions;
    use zip::{CompressionMethod, ZipWriter};

    use crate::data::model::ColumnKind;

    #[test]
    fn reads_csv_and_infers_kinds() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("sales.csv");
        std::fs::write(
            &path,
            "Date,Region,Sales,Units\n\
             2024-01-01 08:00:00,North,10.5,1\n\
             2024-01-02 09:00:00,South,,2\n",
        )
        .expect("write csv");

        let table = load_table(&path, &LoadOptions::default()).expect("load csv");
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.kind_of("Date"), Some(ColumnKind::Temporal));
        assert_eq!(table.kind_of("Region"), Some(ColumnKind::Categorical));
        assert_eq!(table.kind_of("Sales"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind_of("Units"), Some(ColumnKind::Numeric));
        assert!(table.column("Sales").unwrap().values[1].is_null());
    }

    #[test]
    fn repairs_blank_and_repeated_headers() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("dupes.csv");
        std::fs::write(&path, "Sales,,Sales\n1,2,3\n").expect("write csv");

        let table = load_table(&path, &LoadOptions::default()).expect("load csv");
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, ["Sales", "Unnamed: 1", "Sales.1"]);
    }

    #[test]
    fn tsv_uses_tabs_and_trim_option_strips_text() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("data.tsv");
        std::fs::write(&path, "Region\tSales\n North \t5\n").expect("write tsv");

        let options = LoadOptions {
            trim_text: true,
            ..LoadOptions::default()
        };
        let table = load_table(&path, &options).expect("load tsv");
        assert_eq!(
            table.column("Region").unwrap().values[0],
            CellValue::Text("North".to_string())
        );
    }

    #[test]
    fn reads_json_records_with_missing_keys() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"Region": "North", "Sales": 10}, {"Sales": 2.5, "Extra": true}]"#,
        )
        .expect("write json");

        let table = load_table(&path, &LoadOptions::default()).expect("load json");
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, ["Region", "Sales", "Extra"]);
        assert_eq!(table.n_rows(), 2);
        assert!(table.column("Region").unwrap().values[1].is_null());
        assert!(table.column("Extra").unwrap().values[0].is_null());
    }

    #[test]
    fn reads_parquet_columns() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("data.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Region", DataType::Utf8, false),
            Field::new("Units", DataType::Int64, false),
            Field::new("Sales", DataType::Float64, true),
            Field::new(
                "At",
                DataType::Timestamp(TimeUnit::Millisecond, None),
                false,
            ),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["North", "South"])),
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(Float64Array::from(vec![Some(1.5), None])),
                Arc::new(TimestampMillisecondArray::from(vec![
                    1_704_096_000_000,
                    1_704_182_400_000,
                ])),
            ],
        )
        .expect("record batch");
        let file = std::fs::File::create(&path).expect("create parquet");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close writer");

        let table = load_table(&path, &LoadOptions::default()).expect("load parquet");
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.kind_of("Region"), Some(ColumnKind::Categorical));
        assert_eq!(table.kind_of("Units"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind_of("At"), Some(ColumnKind::Temporal));
        assert!(table.column("Sales").unwrap().values[1].is_null());
    }

    #[test]
    fn missing_file_is_unreadable_source() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("nope.xlsx");
        let err = load_table(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::UnreadableSource { .. }));
    }

    #[test]
    fn ragged_rows_are_unreadable() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("ragged.csv");
        std::fs::write(&path, "a,b\n1,2\n3\n").expect("write csv");
        let err = load_table(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::UnreadableSource { .. }));
    }

    #[test]
    fn spreadsheet_dates_follow_the_workbook_epoch() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let serial = |value, is_1904| {
            sheet_cell(&Data::DateTime(ExcelDateTime::new(
                value,
                ExcelDateTimeType::DateTime,
                is_1904,
            )))
        };
        assert_eq!(serial(45292.0, false), CellValue::Date(d));
        assert_eq!(
            serial(45292.5, false),
            CellValue::DateTime(d.and_hms_opt(12, 0, 0).unwrap())
        );
        assert_eq!(
            serial(0.0, true),
            CellValue::Date(NaiveDate::from_ymd_opt(1904, 1, 1).unwrap())
        );
    }

    #[test]
    fn spreadsheet_durations_are_not_timestamps() {
        let half_day = Data::DateTime(ExcelDateTime::new(0.5, ExcelDateTimeType::TimeDelta, false));
        assert_eq!(sheet_cell(&half_day), CellValue::Float(0.5));
        let (kind, _) = crate::data::infer::settle(vec![sheet_cell(&half_day)]);
        assert_eq!(kind, ColumnKind::Numeric);
    }

    #[test]
    fn padded_numbers_stay_numeric() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("padded.csv");
        std::fs::write(&path, "Region,Sales,Note
 North ,  5 , NA 
South, 7,x
")
            .expect("write csv");

        let trimmed = LoadOptions {
            trim_text: true,
            ..LoadOptions::default()
        };
        let table = load_table(&path, &trimmed).expect("load csv");
        assert_eq!(table.kind_of("Sales"), Some(ColumnKind::Numeric));
        assert_eq!(
            table.column("Sales").unwrap().values,
            vec![CellValue::Integer(5), CellValue::Integer(7)]
        );
        assert_eq!(table.column("Region").unwrap().values[0], CellValue::from("North"));
        assert!(table.column("Note").unwrap().values[0].is_null());

        // Numbers parse through their padding even without trimming.
        let table = load_table(&path, &LoadOptions::default()).expect("load csv");
        assert_eq!(table.kind_of("Sales"), Some(ColumnKind::Numeric));
        assert_eq!(table.column("Region").unwrap().values[0], CellValue::from(" North "));
    }

    /// A one-sheet workbook: A = styled serial dates, B = text, C has no
    /// header, D/E share a header, F = text dates.
    fn write_sales_workbook(path: &Path) -> zip::result::ZipResult<()> {
        let text = |r: &str, v: &str| format!(r#"<c r="{r}" t="inlineStr"><is><t>{v}</t></is></c>"#);
        let num = |r: &str, v: &str| format!(r#"<c r="{r}"><v>{v}</v></c>"#);
        let date = |r: &str, v: &str| format!(r#"<c r="{r}" s="1"><v>{v}</v></c>"#);
        let rows = [
            [
                text("A1", "Date"),
                text("B1", "Region"),
                String::new(),
                text("D1", "Sales"),
                text("E1", "Sales"),
                text("F1", "Shipped"),
            ],
            [
                date("A2", "45292"),
                text("B2", "North"),
                num("C2", "1"),
                num("D2", "10"),
                num("E2", "2.5"),
                text("F2", "2024-01-03"),
            ],
            [
                date("A3", "45293"),
                text("B3", "South"),
                num("C3", "2"),
                num("D3", "20"),
                num("E3", "4"),
                text("F3", "2024-01-04"),
            ],
        ];
        let sheet_data: String = rows
            .iter()
            .enumerate()
            .map(|(i, cells)| format!(r#"<row r="{}">{}</row>"#, i + 1, cells.concat()))
            .collect();

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"></Default><Default Extension="xml" ContentType="application/xml"></Default><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"></Override><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"></Override><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"></Override></Types>"#.to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"></Relationship></Relationships>"#.to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sales" sheetId="1" r:id="rId1"></sheet></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"></Relationship><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"></Relationship></Relationships>"#.to_string(),
            ),
            (
                "xl/styles.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"></xf><xf numFmtId="14" applyNumberFormat="1"></xf></cellXfs></styleSheet>"#.to_string(),
            ),
            (
                "xl/worksheets/sheet1.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{sheet_data}</sheetData></worksheet>"#
                ),
            ),
        ];

        let mut zip = ZipWriter::new(std::fs::File::create(path)?);
        let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
        for (name, xml) in parts {
            zip.start_file(name, options)?;
            zip.write_all(xml.as_bytes())?;
        }
        zip.finish()?;
        Ok(())
    }

    #[test]
    fn reads_first_worksheet_of_a_workbook() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("sales.xlsx");
        write_sales_workbook(&path).expect("write workbook");

        let table = load_table(&path, &LoadOptions::default()).expect("load xlsx");
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, ["Date", "Region", "Unnamed: 2", "Sales", "Sales.1", "Shipped"]);
        assert_eq!(table.n_rows(), 2);

        assert_eq!(table.kind_of("Date"), Some(ColumnKind::Temporal));
        assert_eq!(table.kind_of("Region"), Some(ColumnKind::Categorical));
        assert_eq!(table.kind_of("Unnamed: 2"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind_of("Sales"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind_of("Sales.1"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind_of("Shipped"), Some(ColumnKind::Temporal));

        let day = |d| CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, d).unwrap());
        assert_eq!(table.column("Date").unwrap().values, vec![day(1), day(2)]);
        assert_eq!(table.column("Shipped").unwrap().values, vec![day(3), day(4)]);
        assert_eq!(table.column("Region").unwrap().values[1], CellValue::from("South"));
        assert_eq!(table.column("Sales").unwrap().values[1], CellValue::Integer(20));
    }

    #[test]
    fn guesses_cell_types() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("NA"), CellValue::Null);
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type(" 42 "), CellValue::Integer(42));
        assert_eq!(guess_cell_type("4.5"), CellValue::Float(4.5));
        assert_eq!(guess_cell_type("TRUE"), CellValue::Bool(true));
        assert_eq!(guess_cell_type("North"), CellValue::Text("North".into()));
    }
}
