use std::{io, result};

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Error types for record export
#[derive(Error, Debug)]
pub enum ExportError {
    /// The output file could not be written
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON serialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV writing failed: {0}")]
    CsvError(#[from] csv::Error),

    #[error("XLSX writing failed: {0}")]
    XlsxError(#[from] XlsxError),

    /// The output extension names no supported format
    #[error("Unsupported output format '.{extension}', expected xlsx, csv, tsv, json, jl, jsonl or jsonlines")]
    UnsupportedFormat { extension: String },

    /// There is nothing to write
    #[error("No records to export")]
    EmptyRecordSet,
}

pub type Result<T> = result::Result<T, ExportError>;
