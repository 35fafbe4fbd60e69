//! Tabular decoders
//!
//! Implement [`TabularDecoder`] for any uploadable format. A decoder receives the whole upload
//! buffer and returns every data row as a [`RawRecord`] keyed by the header row; later stages
//! never see the source format.

use calamine::{Data, Range, Reader, Xls, Xlsx};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use super::error::DecodeError;
use super::record::{CellValue, RawRecord};

/// Upload formats accepted by the importer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabularFormat {
    Csv,
    Xlsx,
    Xls,
}

impl TabularFormat {
    pub const ALLOWED_EXTENSIONS: [&'static str; 3] = ["csv", "xlsx", "xls"];

    /// Resolve a file extension (with or without the leading dot, any case)
    pub fn from_extension(extension: &str) -> Result<Self, DecodeError> {
        let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "csv" => Ok(TabularFormat::Csv),
            "xlsx" => Ok(TabularFormat::Xlsx),
            "xls" => Ok(TabularFormat::Xls),
            _ => Err(DecodeError::UnsupportedFormat {
                extension: normalized,
            }),
        }
    }

    /// Resolve the format from an uploaded file's original name
    pub fn from_filename(filename: &str) -> Result<Self, DecodeError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            TabularFormat::Csv => "csv",
            TabularFormat::Xlsx => "xlsx",
            TabularFormat::Xls => "xls",
        }
    }
}

impl std::fmt::Display for TabularFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Turns an uploaded buffer into raw records
pub trait TabularDecoder: Send + Sync {
    fn format(&self) -> TabularFormat;

    /// Decode the entire buffer
    ///
    /// The first row is the header. Rows are returned in file order.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<RawRecord>, DecodeError>;
}

/// Comma-separated text, UTF-8 encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDecoder;

impl TabularDecoder for CsvDecoder {
    fn format(&self) -> TabularFormat {
        TabularFormat::Csv
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<RawRecord>, DecodeError> {
        // Ragged rows are accepted: short rows simply lack the trailing keys.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| DecodeError::malformed(TabularFormat::Csv, e))?
            .clone();

        // Blank lines are skipped by the reader but still count as rows of the file
        let mut lines = LineIndex::new(bytes);
        let header_line = headers
            .position()
            .map_or(1, |position| lines.line_at(position.byte()));

        let mut records = Vec::new();
        let mut last_row = 0;
        for row in reader.records() {
            let row = row.map_err(|e| DecodeError::malformed(TabularFormat::Csv, e))?;
            let data_row = row
                .position()
                .map(|position| lines.line_at(position.byte()).saturating_sub(header_line))
                .filter(|data_row| *data_row > last_row)
                .unwrap_or(last_row + 1);
            last_row = data_row;

            let record: RawRecord = headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| (header, CellValue::from(value)))
                .collect();
            records.push(record.at_row(data_row));
        }

        Ok(records)
    }
}

/// Maps byte offsets of CSV records to 1-based line numbers
///
/// Offsets must be requested in increasing order.
struct LineIndex<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineIndex<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            line: 1,
        }
    }

    /// Line holding the first character of the record that starts at or after `byte`
    fn line_at(&mut self, byte: u64) -> usize {
        let mut start = usize::try_from(byte)
            .unwrap_or(usize::MAX)
            .min(self.bytes.len());
        while start < self.bytes.len() && matches!(self.bytes[start], b'\r' | b'\n') {
            start += 1;
        }

        if start > self.offset {
            self.line += self.bytes[self.offset..start]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            self.offset = start;
        }
        self.line
    }
}

/// First worksheet of an Excel workbook (`xlsx` or legacy `xls`)
#[derive(Debug, Clone, Copy)]
pub struct SpreadsheetDecoder {
    format: TabularFormat,
}

impl SpreadsheetDecoder {
    pub fn xlsx() -> Self {
        Self {
            format: TabularFormat::Xlsx,
        }
    }

    pub fn xls() -> Self {
        Self {
            format: TabularFormat::Xls,
        }
    }
}

impl TabularDecoder for SpreadsheetDecoder {
    fn format(&self) -> TabularFormat {
        self.format
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<RawRecord>, DecodeError> {
        let range = match self.format {
            TabularFormat::Xls => first_sheet::<Xls<Cursor<Vec<u8>>>>(bytes, self.format)?,
            _ => first_sheet::<Xlsx<Cursor<Vec<u8>>>>(bytes, self.format)?,
        };
        Ok(sheet_records(&range))
    }
}

/// Pick the decoder for a format
pub fn decoder_for(format: TabularFormat) -> Box<dyn TabularDecoder> {
    match format {
        TabularFormat::Csv => Box::new(CsvDecoder),
        TabularFormat::Xlsx => Box::new(SpreadsheetDecoder::xlsx()),
        TabularFormat::Xls => Box::new(SpreadsheetDecoder::xls()),
    }
}

/// Decode `bytes` according to the declared file extension
///
/// The extension is checked against the allow-list before any parsing happens.
pub fn decode(bytes: &[u8], extension: &str) -> Result<Vec<RawRecord>, DecodeError> {
    let format = TabularFormat::from_extension(extension)?;
    decoder_for(format).decode(bytes)
}

fn first_sheet<R>(bytes: &[u8], format: TabularFormat) -> Result<Range<Data>, DecodeError>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    let mut workbook =
        R::new(Cursor::new(bytes.to_vec())).map_err(|e| DecodeError::malformed(format, e))?;

    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DecodeError::malformed(format, "workbook contains no sheets"))?
        .map_err(|e| DecodeError::malformed(format, e))
}

fn sheet_records(range: &Range<Data>) -> Vec<RawRecord> {
    // The header is row 0, so the enumerate index is the data row
    let mut rows = range.rows().enumerate();
    let Some((_, header_row)) = rows.next() else {
        return Vec::new();
    };
    let headers = sheet_headers(header_row);

    rows.filter_map(|(data_row, row)| {
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter_map(|(header, cell)| cell_value(cell).map(|value| (header.as_str(), value)))
            .collect();
        (!record.is_empty()).then(|| record.at_row(data_row))
    })
    .collect()
}

/// Header names for a worksheet
///
/// Blank header cells become `__EMPTY`, and repeated names get `_1`, `_2`, ... suffixes so
/// every column keeps a distinct key.
fn sheet_headers(row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    row.iter()
        .map(|cell| {
            let base = match cell {
                Data::Empty => "__EMPTY".to_string(),
                other => other.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}_{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Int(*i)),
        Data::Float(f) => Some(CellValue::Float(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        other => Some(CellValue::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TabularFormat::from_extension("csv").unwrap(), TabularFormat::Csv);
        assert_eq!(TabularFormat::from_extension(".XLSX").unwrap(), TabularFormat::Xlsx);
        assert_eq!(TabularFormat::from_extension("Xls").unwrap(), TabularFormat::Xls);

        for bad in ["txt", "json", "xlsm", ""] {
            assert!(
                matches!(
                    TabularFormat::from_extension(bad),
                    Err(DecodeError::UnsupportedFormat { .. })
                ),
                "extension '{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_format_from_filename() {
        assert_eq!(
            TabularFormat::from_filename("Leads March.CSV").unwrap(),
            TabularFormat::Csv
        );
        assert_eq!(
            TabularFormat::from_filename("export.v2.xlsx").unwrap(),
            TabularFormat::Xlsx
        );
        assert!(TabularFormat::from_filename("contacts").is_err());
        assert!(TabularFormat::from_filename(".csv").is_err());
        assert!(TabularFormat::from_filename("contacts.csv.exe").is_err());
    }

    #[test]
    fn test_decode_rejects_unsupported_extension_without_parsing() {
        let err = decode(b"not,even,looked,at", "pdf").unwrap_err();
        match err {
            DecodeError::UnsupportedFormat { extension } => assert_eq!(extension, "pdf"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_csv_rows_keyed_by_header() {
        let csv = "FirstName,Phone,Notes\nAsha,98765,Call back\nRavi,12345,VIP\n";
        let records = CsvDecoder.decode(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].fields(),
            &[
                ("FirstName".to_string(), text("Asha")),
                ("Phone".to_string(), text("98765")),
                ("Notes".to_string(), text("Call back")),
            ]
        );
        assert_eq!(records[1].fields()[0].1, text("Ravi"));
    }

    #[test]
    fn test_csv_rows_numbered_by_position_in_file() {
        let csv = "FirstName,Phone,Notes\nAsha,1,n\n\nRavi,2,\n\r\n\r\nMeera,3,n";
        let records = CsvDecoder.decode(csv.as_bytes()).unwrap();

        let rows: Vec<_> = records.iter().map(|record| record.row()).collect();
        assert_eq!(rows, vec![Some(1), Some(3), Some(6)]);
    }

    #[test]
    fn test_csv_row_numbers_follow_quoted_line_breaks() {
        let csv = "FirstName,Phone,Notes\r\nAsha,1,\"line one\r\nline two\"\r\nRavi,2,n\r\n";
        let records = CsvDecoder.decode(csv.as_bytes()).unwrap();

        assert_eq!(records[0].row(), Some(1));
        assert_eq!(records[1].row(), Some(3));
    }

    #[test]
    fn test_csv_ragged_rows_are_tolerated() {
        let csv = "FirstName,Phone,Notes\nAsha,98765\nRavi,12345,VIP,extra\n";
        let records = CsvDecoder.decode(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 2);
        assert!(records[0].fields().iter().all(|(k, _)| k != "Notes"));
        assert_eq!(records[1].len(), 3);
    }

    #[test]
    fn test_csv_quoted_fields_and_empty_cells() {
        let csv = "FirstName,Phone,Notes\n\"Doe, Jane\",555,\"said \"\"hi\"\"\"\nSam,,\n";
        let records = CsvDecoder.decode(csv.as_bytes()).unwrap();

        assert_eq!(records[0].fields()[0].1, text("Doe, Jane"));
        assert_eq!(records[0].fields()[2].1, text("said \"hi\""));
        assert_eq!(records[1].fields()[1].1, text(""));
    }

    #[test]
    fn test_csv_header_only_and_empty_input() {
        assert!(CsvDecoder.decode(b"FirstName,Phone,Notes\n").unwrap().is_empty());
        assert!(CsvDecoder.decode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_csv_invalid_utf8_is_malformed() {
        let mut bytes = b"FirstName,Phone,Notes\nAsha,1,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        bytes.push(b'\n');

        let err = CsvDecoder.decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedInput {
                format: TabularFormat::Csv,
                ..
            }
        ));
    }

    #[test]
    fn test_spreadsheet_garbage_is_malformed() {
        for decoder in [SpreadsheetDecoder::xlsx(), SpreadsheetDecoder::xls()] {
            let err = decoder.decode(b"FirstName,Phone,Notes\nAsha,1,x\n").unwrap_err();
            assert!(
                matches!(err, DecodeError::MalformedInput { format, .. } if format == decoder.format()),
                "expected malformed input for {}",
                decoder.format()
            );
        }
    }

    #[test]
    fn test_sheet_headers_dedupe_and_fill_blanks() {
        let row = vec![
            Data::String("Phone".to_string()),
            Data::Empty,
            Data::String("Phone".to_string()),
            Data::Empty,
            Data::Float(2024.0),
        ];
        assert_eq!(
            sheet_headers(&row),
            vec!["Phone", "__EMPTY", "Phone_1", "__EMPTY_1", "2024"]
        );
    }

    #[test]
    fn test_sheet_records_skip_blank_cells_and_rows() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 2));
        range.set_value((0, 0), Data::String("FirstName".to_string()));
        range.set_value((0, 1), Data::String("Phone".to_string()));
        range.set_value((0, 2), Data::String("Notes".to_string()));
        range.set_value((1, 0), Data::String("Asha".to_string()));
        range.set_value((1, 1), Data::Float(9876543210.0));
        // Row 2 left entirely empty.
        range.set_value((3, 0), Data::String("Ravi".to_string()));
        range.set_value((3, 2), Data::Bool(true));

        let records = sheet_records(&range);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row(), Some(1));
        assert_eq!(records[1].row(), Some(3));
        assert_eq!(
            records[0].fields(),
            &[
                ("FirstName".to_string(), text("Asha")),
                ("Phone".to_string(), CellValue::Float(9876543210.0)),
            ]
        );
        assert_eq!(
            records[1].fields(),
            &[
                ("FirstName".to_string(), text("Ravi")),
                ("Notes".to_string(), CellValue::Bool(true)),
            ]
        );
    }
}
