// ABOUTME: CSV and JSON import/export of equipment record lists.
// ABOUTME: CSV export quotes per RFC 4180; CSV import is a naive line split that cannot read embedded newlines.

use std::path::Path;

use thiserror::Error;

use crate::record::EquipmentRecord;

/// Column order for CSV export; also the header names recognized on import.
pub const CSV_COLUMNS: [&str; 6] = [
    "name",
    "manufacturer",
    "model",
    "serial_number",
    "image",
    "description",
];

/// Suggested file name for an export of the selected records.
pub const SELECTED_EXPORT_FILE_NAME: &str = "equipment_selected.csv";

/// Errors raised while encoding an export.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The file could not be turned into records. Nothing is imported.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported import format: {0}")]
    UnsupportedFormat(String),

    #[error("could not read import file: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Pick the format from the file extension (`.json` or `.csv`).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?;
        match ext {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Encode records as CSV with a header row. Fields containing a comma, quote,
/// or newline are quoted with internal quotes doubled.
pub fn export_csv(records: &[EquipmentRecord]) -> Result<String, CodecError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS)?;
    for r in records {
        writer.write_record([
            &r.name,
            &r.manufacturer,
            &r.model,
            &r.serial_number,
            &r.image,
            &r.description,
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Decode CSV by splitting on newlines and commas. Only the outermost quotes
/// of a cell are stripped and doubled quotes collapsed, so quoted cells that
/// contain a comma or newline are split incorrectly. Unknown columns are
/// ignored; missing cells become empty strings.
pub fn parse_csv(text: &str) -> Vec<EquipmentRecord> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
    let headers: Vec<&str> = match lines.next() {
        Some(header) => header.split(',').map(str::trim).collect(),
        None => return Vec::new(),
    };

    lines
        .map(|line| {
            let cells: Vec<&str> = line.split(',').collect();
            let mut record = EquipmentRecord::default();
            for (idx, header) in headers.iter().enumerate() {
                let value = cells.get(idx).map(|c| unquote(c)).unwrap_or_default();
                match *header {
                    "name" => record.name = value,
                    "manufacturer" => record.manufacturer = value,
                    "model" => record.model = value,
                    "serial_number" => record.serial_number = value,
                    "image" => record.image = value,
                    "description" => record.description = value,
                    _ => {}
                }
            }
            record
        })
        .collect()
}

fn unquote(cell: &str) -> String {
    let cell = cell.strip_prefix('"').unwrap_or(cell);
    let cell = cell.strip_suffix('"').unwrap_or(cell);
    cell.replace("\"\"", "\"")
}

pub fn export_json(records: &[EquipmentRecord]) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Decode a JSON array of records. Absent fields default to empty strings.
pub fn parse_json(text: &str) -> Result<Vec<EquipmentRecord>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Decode an import file, choosing the codec from its name.
pub fn decode_import(file_name: &str, contents: &str) -> Result<Vec<EquipmentRecord>, ImportError> {
    match ImportFormat::from_file_name(file_name) {
        Some(ImportFormat::Json) => {
            parse_json(contents).map_err(|e| ImportError::Malformed(e.to_string()))
        }
        Some(ImportFormat::Csv) => Ok(parse_csv(contents)),
        None => Err(ImportError::UnsupportedFormat(file_name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<EquipmentRecord> {
        vec![
            EquipmentRecord::new("Pump", "Baxter", "Sigma", "S-1", "/images/equipos/pump.png", "Infusion pump"),
            EquipmentRecord::new("Monitor", "Philips", "MX40", "M-2", "/images/equipos/mx.png", "Telemetry"),
        ]
    }

    #[test]
    fn export_writes_header_and_fixed_column_order() {
        let csv = export_csv(&sample()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("name,manufacturer,model,serial_number,image,description")
        );
        assert_eq!(
            lines.next(),
            Some("Pump,Baxter,Sigma,S-1,/images/equipos/pump.png,Infusion pump")
        );
    }

    #[test]
    fn export_quotes_commas_quotes_and_newlines() {
        let record = EquipmentRecord::new("A, B", "Say \"hi\"", "line\nbreak", "S", "i", "plain");
        let csv = export_csv(&[record]).unwrap();
        assert!(csv.contains("\"A, B\""));
        assert!(csv.contains("\"Say \"\"hi\"\"\""));
        assert!(csv.contains("\"line\nbreak\""));
        assert!(csv.contains(",plain"));
    }

    #[test]
    fn csv_round_trip_preserves_name_serial_pairs() {
        let records = sample();
        let parsed = parse_csv(&export_csv(&records).unwrap());

        let pairs = |rs: &[EquipmentRecord]| -> Vec<(String, String)> {
            rs.iter()
                .map(|r| (r.name.clone(), r.serial_number.clone()))
                .collect()
        };
        assert_eq!(pairs(&parsed), pairs(&records));
        assert_eq!(parsed, records);
    }

    #[test]
    fn parse_csv_unquotes_and_tolerates_short_rows() {
        let text = "name,serial_number,extra\n\"Pump\",\"S\"\"1\",x\nMonitor\r\n";
        let parsed = parse_csv(text);

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Pump");
        assert_eq!(parsed[0].serial_number, "S\"1");
        assert_eq!(parsed[1].name, "Monitor");
        assert!(parsed[1].serial_number.is_empty());
    }

    #[test]
    fn parse_csv_splits_quoted_commas() {
        let parsed = parse_csv("name,manufacturer\n\"A, B\",Acme");
        assert_eq!(parsed[0].name, "A");
        assert_eq!(parsed[0].manufacturer, " B");
    }

    #[test]
    fn parse_csv_of_blank_text_is_empty() {
        assert!(parse_csv("  \n ").is_empty());
    }

    #[test]
    fn decode_import_dispatches_on_extension() {
        let json = export_json(&sample()).unwrap();
        assert_eq!(decode_import("backup.json", &json).unwrap(), sample());

        let csv = export_csv(&sample()).unwrap();
        assert_eq!(decode_import("list.csv", &csv).unwrap().len(), 2);

        assert!(matches!(
            decode_import("list.xlsx", "whatever"),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            decode_import("broken.json", "[{"),
            Err(ImportError::Malformed(_))
        ));
    }

    #[test]
    fn format_from_file_name() {
        assert_eq!(ImportFormat::from_file_name("a.json"), Some(ImportFormat::Json));
        assert_eq!(ImportFormat::from_file_name("dir/a.csv"), Some(ImportFormat::Csv));
        assert_eq!(ImportFormat::from_file_name("csv"), None);
    }
}
