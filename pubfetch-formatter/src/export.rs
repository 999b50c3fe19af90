//! Record export to spreadsheet and JSON files
//!
//! The format follows the output file extension:
//!
//! - **XLSX** - a `Result` sheet with a styled, frozen header row, banded rows
//!   and `pmid`, `pmc` and `doi` written as URL cells
//! - **CSV / TSV** - one column per field; `pmid`, `pmc` and `doi` cells become
//!   `=HYPERLINK(...)` formulas so spreadsheet apps render them as links
//! - **JSON** - a single array of objects
//! - **JSON lines** (`.jl`, `.jsonl`, `.jsonlines`) - one object per line
//!
//! Columns are ordered by [`FIELD_ORDER`], then [`TRAILING_FIELDS`].

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::result;

use pubfetch_parser::{ABSENT, ArticleRecord};
use rust_xlsxwriter::{Color, Format, FormatAlign, Url, Workbook};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::error::{ExportError, Result};

/// Preferred column order
pub const FIELD_ORDER: &[&str] = &[
    "pmid",
    "title",
    "abstract",
    "abstract_cn",
    "impact_factor",
    "journal",
    "med_abbr",
    "iso_abbr",
    "pubdate",
    "pubmed_pubdate",
    "pmc",
    "issn",
    "e_issn",
    "doi",
    "year",
    "pagination",
    "volume",
    "issue",
    "pub_status",
    "authors",
    "keywords",
    "pub_types",
    "cited",
];

/// Record fields outside [`FIELD_ORDER`], in record order
pub const TRAILING_FIELDS: &[&str] = &[
    "author_mail",
    "author_first",
    "author_last",
    "affiliations",
    "journal_date",
];

/// Fields given a wide, wrapping column in spreadsheets
const WIDE_FIELDS: &[&str] = &["abstract", "abstract_cn"];

const SHEET_NAME: &str = "Result";
const COLUMN_WIDTH: f64 = 18.0;
const WIDE_COLUMN_WIDTH: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Tsv,
    Json,
    JsonLines,
}

impl OutputFormat {
    /// Pick the format from the file extension, case-insensitively
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            "jl" | "jsonl" | "jsonlines" => Ok(OutputFormat::JsonLines),
            _ => Err(ExportError::UnsupportedFormat { extension }),
        }
    }
}

/// Split a `-f/--fields` argument (`"pmid,title,"`) into field names
pub fn parse_field_list(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

fn field_rank(key: &str) -> usize {
    FIELD_ORDER
        .iter()
        .chain(TRAILING_FIELDS)
        .position(|field| *field == key)
        .unwrap_or(usize::MAX)
}

/// One exported row: the record's serialized fields, filtered and ordered
#[derive(Debug, Clone, PartialEq)]
pub struct Row(Vec<(String, Value)>);

impl Row {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Serialize `record`, keep only `fields` (all fields when `None`) and order the result
pub fn record_row(record: &ArticleRecord, fields: Option<&[String]>) -> Result<Row> {
    let object = match serde_json::to_value(record)? {
        Value::Object(object) => object,
        _ => Map::new(),
    };

    let mut entries: Vec<(String, Value)> = object
        .into_iter()
        .filter(|(key, _)| fields.is_none_or(|fields| fields.iter().any(|f| f == key)))
        .collect();
    entries.sort_by_key(|(key, _)| field_rank(key));
    Ok(Row(entries))
}

/// Write `records` to `path` in the format its extension names; returns the row count
#[instrument(skip(records, fields), fields(path = %path.as_ref().display(), records = records.len()))]
pub fn export_records(
    records: &[ArticleRecord],
    path: impl AsRef<Path>,
    fields: Option<&[String]>,
) -> Result<usize> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    if records.is_empty() {
        return Err(ExportError::EmptyRecordSet);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_records(records, &mut writer, format, fields)?;
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "Saved file");
    Ok(records.len())
}

/// Write `records` to any writer in `format`
pub fn write_records<W: Write>(
    records: &[ArticleRecord],
    writer: W,
    format: OutputFormat,
    fields: Option<&[String]>,
) -> Result<()> {
    if records.is_empty() {
        return Err(ExportError::EmptyRecordSet);
    }

    let rows = records
        .iter()
        .map(|record| record_row(record, fields))
        .collect::<Result<Vec<_>>>()?;
    debug!(rows = rows.len(), ?format, "Writing rows");

    match format {
        OutputFormat::Xlsx => write_xlsx(&rows, writer),
        OutputFormat::Csv => write_delimited(&rows, writer, b','),
        OutputFormat::Tsv => write_delimited(&rows, writer, b'\t'),
        OutputFormat::Json => write_json(&rows, writer),
        OutputFormat::JsonLines => write_json_lines(&rows, writer),
    }
}

fn write_json<W: Write>(rows: &[Row], mut writer: W) -> Result<()> {
    serde_json::to_writer(&mut writer, rows)?;
    writeln!(writer)?;
    Ok(())
}

fn write_json_lines<W: Write>(rows: &[Row], mut writer: W) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Union of the rows' keys, in export order
fn column_order(rows: &[Row]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for key in rows.iter().flat_map(Row::keys) {
        if !columns.contains(&key) {
            columns.push(key);
        }
    }
    columns.sort_by_key(|key| field_rank(key));
    columns
}

fn write_delimited<W: Write>(rows: &[Row], writer: W, delimiter: u8) -> Result<()> {
    let columns = column_order(rows);

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    csv_writer.write_record(&columns)?;

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|key| row.get(key).map(|value| csv_cell(key, value)).unwrap_or_default())
            .collect();
        csv_writer.write_record(&cells)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_xlsx<W: Write>(rows: &[Row], mut writer: W) -> Result<()> {
    let columns = column_order(rows);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    sheet.set_freeze_panes(1, 1)?;

    let header = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_background_color(Color::White);
    for (col, key) in (0u16..).zip(&columns) {
        let width = if WIDE_FIELDS.contains(key) {
            WIDE_COLUMN_WIDTH
        } else {
            COLUMN_WIDTH
        };
        sheet.set_column_width(col, width)?;
        sheet.write_string_with_format(0, col, *key, &header)?;
    }

    for (row_num, row) in (1u32..).zip(rows) {
        // Banded rows, light cyan on the first data row
        let fill = if row_num % 2 == 1 { 0xB3FFFF } else { 0xB3FFB3 };
        let plain = Format::new()
            .set_background_color(Color::RGB(fill))
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter);
        let wrapped = plain.clone().set_text_wrap();
        let link = plain.clone().set_font_color(Color::Blue).set_italic();

        for (col, key) in (0u16..).zip(&columns) {
            let Some(value) = row.get(key) else {
                sheet.write_blank(row_num, col, &plain)?;
                continue;
            };
            if let Some(number) = value.as_f64() {
                sheet.write_number_with_format(row_num, col, number, &plain)?;
                continue;
            }

            let text = cell_text(value);
            if let Some(url) = hyperlink_url(key, &text) {
                sheet.write_url_with_format(row_num, col, Url::new(url).set_text(&text), &link)?;
            } else if WIDE_FIELDS.contains(key) {
                sheet.write_string_with_format(row_num, col, &text, &wrapped)?;
            } else {
                sheet.write_string_with_format(row_num, col, &text, &plain)?;
            }
        }
    }

    writer.write_all(&workbook.save_to_buffer()?)?;
    Ok(())
}

/// Spreadsheet text for one value
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => match items.iter().map(Value::as_str).collect::<Option<Vec<_>>>() {
            Some(strings) => strings.join(", "),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// CSV text for one value; linked fields become `=HYPERLINK` formulas
fn csv_cell(key: &str, value: &Value) -> String {
    let text = cell_text(value);
    match hyperlink_url(key, &text) {
        Some(url) => format!(
            "=HYPERLINK(\"{}\",\"{}\")",
            url.replace('"', "\"\""),
            text.replace('"', "\"\"")
        ),
        None => text,
    }
}

fn hyperlink_url(key: &str, value: &str) -> Option<String> {
    if value == ABSENT || value.is_empty() {
        return None;
    }
    match key {
        "pmid" => Some(format!("https://pubmed.ncbi.nlm.nih.gov/{value}/")),
        "pmc" => Some(format!("https://www.ncbi.nlm.nih.gov/pmc/articles/{value}/")),
        "doi" => Some(format!("https://doi.org/{value}")),
        _ => None,
    }
}
