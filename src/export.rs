//! CSV and JSON encoders for projection results
//!
//! CSV is row oriented (one row per month). JSON is the column-oriented
//! `monthly_data` / `summary` / `inputs` object.

use crate::error::ExportError;
use crate::projection::ProjectionResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the monthly records as CSV with a header row
pub fn write_csv<W: Write>(result: &ProjectionResult, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in &result.monthly_data {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Encode the monthly records as a CSV string
pub fn to_csv_string(result: &ProjectionResult) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(result, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Encode the full result as indented JSON
pub fn to_json_pretty(result: &ProjectionResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write the CSV export to a file
pub fn write_csv_file<P: AsRef<Path>>(result: &ProjectionResult, path: P) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    write_csv(result, BufWriter::new(file))?;
    log::debug!("wrote CSV to {}", path.as_ref().display());
    Ok(())
}

/// Write the JSON export to a file
pub fn write_json_file<P: AsRef<Path>>(result: &ProjectionResult, path: P) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.flush()?;
    log::debug!("wrote JSON to {}", path.as_ref().display());
    Ok(())
}
