//! Tabular decoder for uploaded buffers
//!
//! This module converts a raw upload buffer plus its declared format into an
//! ordered sequence of untyped [`RawRow`]s. Delimited text (`.csv`, `.txt`)
//! keeps every cell as a string; spreadsheets (`.xlsx`, first sheet only)
//! keep the native string/number type the reader reports.
//!
//! Decoding is a pure transformation of the buffer: no side effects, output
//! row order matches input row order.
//!
//! Every decoded row carries one entry per table header; cells that are
//! absent or empty in the source become empty text. Downstream stages rely on
//! this to tell "header missing from the table" apart from "cell left blank".
//!
//! # Examples
//!
//! ```
//! use utilstat::decoder::{decode, UploadFormat};
//!
//! let buffer = b"Timestamp,Total Water (Liters)\n2024-01-01 08:00,10\n";
//! let format = UploadFormat::from_extension("csv").unwrap();
//! let rows = decode(buffer, format).unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

use crate::error::{Result, UtilstatError};
use crate::types::{CellValue, RawRow};
use calamine::{Data, DataType as _, Reader, Xlsx};
use std::io::Cursor;
use tracing::debug;

/// Declared format of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// Header-row-first delimited text (`.csv`, and `.txt` treated the same)
    DelimitedText,
    /// XLSX workbook; only the first sheet is read
    Spreadsheet,
}

impl UploadFormat {
    /// Resolve a declared file extension to a format
    ///
    /// # Errors
    ///
    /// Returns [`UtilstatError::UnsupportedFormat`] for anything other than
    /// `csv`, `txt`, or `xlsx` (leading dot and case are ignored).
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension
            .trim()
            .trim_start_matches('.')
            .to_lowercase()
            .as_str()
        {
            "csv" | "txt" => Ok(Self::DelimitedText),
            "xlsx" => Ok(Self::Spreadsheet),
            _ => Err(UtilstatError::UnsupportedFormat(extension.to_string())),
        }
    }
}

/// Decode an upload buffer into untyped rows
pub fn decode(buffer: &[u8], format: UploadFormat) -> Result<Vec<RawRow>> {
    let rows = match format {
        UploadFormat::DelimitedText => decode_delimited(buffer)?,
        UploadFormat::Spreadsheet => decode_spreadsheet(buffer)?,
    };
    debug!("decoded {} rows ({:?})", rows.len(), format);
    Ok(rows)
}

fn decode_delimited(buffer: &[u8]) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(buffer);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_header_name)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = RawRow::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let field = record.get(idx).unwrap_or("");
            row.insert(header.clone(), CellValue::Text(field.to_string()));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn decode_spreadsheet(buffer: &[u8]) -> Result<Vec<RawRow>> {
    let mut workbook = Xlsx::new(Cursor::new(buffer))?;

    // First sheet only; a workbook without sheets decodes to zero rows and is
    // rejected as an empty dataset downstream.
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(Vec::new());
    };
    let range = range?;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = header_row.iter().map(header_cell_name).collect();

    let mut rows = Vec::new();
    for sheet_row in sheet_rows {
        let mut row = RawRow::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = sheet_row
                .get(idx)
                .and_then(cell_value)
                .unwrap_or_else(|| CellValue::Text(String::new()));
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Excel and other tools sometimes emit UTF-8 with a BOM prefix on the first
/// header; without stripping it, exact-match column lookups fail.
fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn header_cell_name(cell: &Data) -> String {
    if cell.is_empty() {
        return String::new();
    }
    match cell.get_string() {
        Some(s) => normalize_header_name(s),
        None => normalize_header_name(&cell.to_string()),
    }
}

/// Map a spreadsheet cell to its decoded value, keeping the native type.
fn cell_value(cell: &Data) -> Option<CellValue> {
    if cell.is_empty() {
        return None;
    }
    if cell.is_string() {
        return cell.get_string().map(|s| CellValue::Text(s.to_string()));
    }
    if let Some(n) = cell.as_f64() {
        return Some(CellValue::Number(n));
    }
    Some(CellValue::Text(cell.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            UploadFormat::from_extension("csv").unwrap(),
            UploadFormat::DelimitedText
        );
        assert_eq!(
            UploadFormat::from_extension(".CSV").unwrap(),
            UploadFormat::DelimitedText
        );
        assert_eq!(
            UploadFormat::from_extension("txt").unwrap(),
            UploadFormat::DelimitedText
        );
        assert_eq!(
            UploadFormat::from_extension("xlsx").unwrap(),
            UploadFormat::Spreadsheet
        );

        let err = UploadFormat::from_extension("pdf").unwrap_err();
        assert!(matches!(err, UtilstatError::UnsupportedFormat(ext) if ext == "pdf"));
    }

    #[test]
    fn test_delimited_decoding() {
        let buffer = b"Timestamp,Total Water (Liters),Drinking (Liters)\n\
                       2024-01-01 08:00,10,3\n\
                       2024-01-01 20:00,5,1\n";
        let rows = decode(buffer, UploadFormat::DelimitedText).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("Timestamp"),
            Some(&CellValue::Text("2024-01-01 08:00".to_string()))
        );
        assert_eq!(
            rows[0].get("Total Water (Liters)"),
            Some(&CellValue::Text("10".to_string()))
        );
        assert_eq!(
            rows[1].get("Drinking (Liters)"),
            Some(&CellValue::Text("1".to_string()))
        );
    }

    #[test]
    fn test_delimited_blank_cells_are_present() {
        let buffer = b"Timestamp,Total Water (Liters)\n2024-01-01 08:00,\n";
        let rows = decode(buffer, UploadFormat::DelimitedText).unwrap();

        // Blank cell, not an absent header.
        assert_eq!(
            rows[0].get("Total Water (Liters)"),
            Some(&CellValue::Text(String::new()))
        );
    }

    #[test]
    fn test_delimited_short_rows_are_padded() {
        let buffer = b"Timestamp,Total Water (Liters),Drinking (Liters)\n2024-01-01 08:00,10\n";
        let rows = decode(buffer, UploadFormat::DelimitedText).unwrap();

        assert_eq!(rows[0].len(), 3);
        assert_eq!(
            rows[0].get("Drinking (Liters)"),
            Some(&CellValue::Text(String::new()))
        );
    }

    #[test]
    fn test_bom_header_stripped() {
        let buffer = "\u{feff}Timestamp,Total Water (Liters)\n2024-01-01 08:00,10\n".as_bytes();
        let rows = decode(buffer, UploadFormat::DelimitedText).unwrap();

        assert!(rows[0].contains_key("Timestamp"));
    }

    #[test]
    fn test_empty_buffer_decodes_to_no_rows() {
        let rows = decode(b"", UploadFormat::DelimitedText).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_invalid_spreadsheet_buffer() {
        let err = decode(b"definitely not a workbook", UploadFormat::Spreadsheet).unwrap_err();
        assert!(matches!(err, UtilstatError::Spreadsheet(_)));
    }
}
