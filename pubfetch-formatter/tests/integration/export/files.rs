//! Writing record sets to XLSX, CSV, TSV, JSON and JSON lines files

#[path = "../common/mod.rs"]
mod common;

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use common::citation_records;
use pubfetch_formatter::{
    ExportError, FIELD_ORDER, OutputFormat, export_records, parse_field_list, write_records,
};
use pubfetch_parser::{Citations, ImpactFactor};
use serde_json::Value;
use tracing_test::traced_test;

fn enriched_records() -> Vec<pubfetch_parser::ArticleRecord> {
    let mut records = citation_records();
    records[0].enrichment.impact_factor = Some(ImpactFactor::Found(176.079));
    records[0].enrichment.cited = Some(Citations::new(vec!["1".into(), "2".into()]));
    records[0].enrichment.abstract_cn = Some("摘要".into());
    records[1].enrichment.impact_factor = Some(ImpactFactor::NotFound);
    records[1].enrichment.cited = Some(Citations::default());
    records[1].enrichment.abstract_cn = Some(".".into());
    records
}

fn read_table(path: &Path, delimiter: u8) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

#[test]
#[traced_test]
fn test_csv_export_orders_columns_and_links_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pubfetch.csv");

    let written = export_records(&enriched_records(), &path, None).unwrap();
    assert_eq!(written, 2);
    assert!(logs_contain("Saved file"));

    let (headers, rows) = read_table(&path, b',');
    assert_eq!(&headers[..FIELD_ORDER.len()], FIELD_ORDER);
    assert_eq!(
        &headers[FIELD_ORDER.len()..],
        ["author_mail", "author_first", "author_last", "affiliations", "journal_date"]
    );

    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let nejm = &rows[0];
    assert_eq!(
        nejm[column("pmid")],
        "=HYPERLINK(\"https://pubmed.ncbi.nlm.nih.gov/31978945/\",\"31978945\")"
    );
    assert_eq!(
        nejm[column("pmc")],
        "=HYPERLINK(\"https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7092803/\",\"PMC7092803\")"
    );
    assert_eq!(nejm[column("impact_factor")], "176.079");
    assert_eq!(nejm[column("cited")], r#"{"count":2,"links":["1","2"]}"#);
    assert_eq!(nejm[column("abstract_cn")], "摘要");

    let sparse = &rows[1];
    assert_eq!(sparse[column("doi")], ".");
    assert_eq!(sparse[column("pmc")], ".");
    assert_eq!(sparse[column("impact_factor")], ".");
    assert_eq!(sparse[column("keywords")], "alpha, beta");
    assert_eq!(sparse[column("authors")], "Jane Q Doe\nEditorial Board");
}

#[test]
fn test_tsv_export_with_field_allowlist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.tsv");
    let fields = parse_field_list("doi,title,pmid");

    export_records(&citation_records(), &path, Some(&fields)).unwrap();

    let (headers, rows) = read_table(&path, b'\t');
    assert_eq!(headers, vec!["pmid", "title", "doi"]);
    assert_eq!(rows[1][1], "Test title.");
}

#[test]
fn test_json_export_is_one_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let fields = parse_field_list("pmid,year,cited");

    export_records(&enriched_records(), &path, Some(&fields)).unwrap();

    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["pmid"], "31978945");
    assert_eq!(rows[0]["year"], "2020");
    assert_eq!(rows[0]["cited"]["count"], 2);
    assert_eq!(rows[1]["cited"]["links"], Value::Array(vec![]));
    assert!(rows[0].get("title").is_none());
}

#[test]
fn test_json_lines_keep_field_order() {
    let mut buffer = Vec::new();
    write_records(
        &citation_records(),
        &mut buffer,
        OutputFormat::JsonLines,
        Some(&parse_field_list("title,pmid")),
    )
    .unwrap();

    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], r#"{"pmid":"10051234","title":"Test title."}"#);
}

/// A raw part of the written xlsx package
fn xlsx_part(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut part = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut part)
        .unwrap();
    part
}

#[test]
#[traced_test]
fn test_xlsx_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pubfetch.xlsx");

    let written = export_records(&enriched_records(), &path, None).unwrap();
    assert_eq!(written, 2);
    assert!(logs_contain("Saved file"));

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Result".to_string()]);
    let range = workbook.worksheet_range("Result").unwrap();
    let rows: Vec<&[Data]> = range.rows().collect();
    assert_eq!(rows.len(), 3);

    let headers: Vec<String> = rows[0].iter().map(|cell| cell.to_string()).collect();
    assert_eq!(&headers[..FIELD_ORDER.len()], FIELD_ORDER);
    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();

    let nejm = rows[1];
    assert_eq!(nejm[column("pmid")], Data::String("31978945".into()));
    assert_eq!(nejm[column("pmc")], Data::String("PMC7092803".into()));
    assert_eq!(nejm[column("impact_factor")], Data::Float(176.079));
    assert_eq!(
        nejm[column("cited")],
        Data::String(r#"{"count":2,"links":["1","2"]}"#.into())
    );
    assert_eq!(nejm[column("abstract_cn")], Data::String("摘要".into()));

    let sparse = rows[2];
    assert_eq!(sparse[column("doi")], Data::String(".".into()));
    assert_eq!(sparse[column("impact_factor")], Data::String(".".into()));
    assert_eq!(sparse[column("keywords")], Data::String("alpha, beta".into()));

    // Linked ids are real hyperlinks, not formulas
    let links = xlsx_part(&path, "xl/worksheets/_rels/sheet1.xml.rels");
    assert!(links.contains(r#"Target="https://pubmed.ncbi.nlm.nih.gov/31978945/""#));
    assert!(links.contains(r#"Target="https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7092803/""#));
    assert!(!links.contains("https://doi.org/.\""));

    let sheet = xlsx_part(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"topLeftCell="B2""#));
    assert!(sheet.contains(r#"state="frozen""#));
    assert!(!sheet.contains("HYPERLINK"));
}

#[test]
fn test_unsupported_extension_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pubfetch.xls");

    let err = export_records(&citation_records(), &path, None).unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedFormat { ref extension } if extension == "xls"));
    assert!(!path.exists());
}

#[test]
fn test_empty_record_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    let err = export_records(&[], &path, None).unwrap_err();
    assert!(matches!(err, ExportError::EmptyRecordSet));
    assert!(!path.exists());
}
