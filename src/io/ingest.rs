//! CSV ingest.
//!
//! Turns a delimited measurement table into `Vec<Measurement>`.
//!
//! - Required columns: `Conductivity` and `Seebeck` (matched case-insensitively,
//!   whitespace-trimmed, UTF-8 BOM stripped). Other columns are ignored.
//! - A row with a missing, unparsable or non-finite required value aborts the
//!   load with the offending line number (exit code 2).
//! - An empty table is exit code 3.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::info;

use crate::domain::Measurement;
use crate::error::AppError;

const CONDUCTIVITY: &str = "conductivity";
const SEEBECK: &str = "seebeck";

/// Load measurements from a file.
pub fn load_measurements(path: &Path, delimiter: u8) -> Result<Vec<Measurement>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open data file '{}': {e}", path.display()))
    })?;
    let measurements = read_measurements(file, delimiter)?;
    info!("Loaded {} measurement(s) from {}", measurements.len(), path.display());
    Ok(measurements)
}

/// Parse measurements from any reader (used by `load_measurements` and tests).
pub fn read_measurements<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Measurement>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let cond_idx = require_column(&header_map, CONDUCTIVITY, "Conductivity")?;
    let seeb_idx = require_column(&header_map, SEEBECK, "Seebeck")?;

    let mut out = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| match e.position() {
            Some(pos) => AppError::new(2, format!("CSV parse error on line {}: {e}", pos.line())),
            None => AppError::new(2, format!("CSV parse error: {e}")),
        })?;
        // The reader skips empty lines, so take the line from the record itself.
        let line = record.position().map_or(0, |pos| pos.line());

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let conductivity = parse_value(&record, cond_idx, "Conductivity", line)?;
        let seebeck = parse_value(&record, seeb_idx, "Seebeck", line)?;
        out.push(Measurement { conductivity, seebeck });
    }

    if out.is_empty() {
        return Err(AppError::new(3, "The data table contains no measurements."));
    }
    Ok(out)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins on duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_ascii_lowercase()
}

fn require_column(header_map: &HashMap<String, usize>, key: &str, label: &str) -> Result<usize, AppError> {
    header_map
        .get(key)
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing required column: `{label}`")))
}

fn parse_value(record: &StringRecord, idx: usize, label: &str, line: u64) -> Result<f64, AppError> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::new(2, format!("Line {line}: missing `{label}` value.")))?;
    let value = raw
        .parse::<f64>()
        .map_err(|_| AppError::new(2, format!("Line {line}: invalid `{label}` value '{raw}'.")))?;
    if !value.is_finite() {
        return Err(AppError::new(2, format!("Line {line}: non-finite `{label}` value '{raw}'.")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_columns_in_any_order() {
        let csv = "Temperature,Seebeck,Conductivity\n300,150,1e5\n300,-80,5e5\n";
        let m = read_measurements(csv.as_bytes(), b',').unwrap();
        assert_eq!(
            m,
            vec![
                Measurement { conductivity: 1e5, seebeck: 150.0 },
                Measurement { conductivity: 5e5, seebeck: -80.0 },
            ]
        );
    }

    #[test]
    fn headers_are_case_insensitive_and_bom_tolerant() {
        let csv = "\u{feff}conductivity ; SEEBECK\n1000;200\n";
        let m = read_measurements(csv.as_bytes(), b';').unwrap();
        assert_eq!(m, vec![Measurement { conductivity: 1000.0, seebeck: 200.0 }]);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_measurements("Conductivity\n1\n".as_bytes(), b',').unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Seebeck"));
    }

    #[test]
    fn malformed_row_names_the_line() {
        let csv = "Conductivity,Seebeck\n1e5,150\nabc,80\n";
        let err = read_measurements(csv.as_bytes(), b',').unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Line 3"), "{}", err.message());
    }

    #[test]
    fn malformed_row_after_blank_lines_names_its_own_line() {
        let csv = "Conductivity,Seebeck\n1e5,150\n\n\nabc,80\n";
        let err = read_measurements(csv.as_bytes(), b',').unwrap_err();
        assert!(err.message().starts_with("Line 5:"), "{}", err.message());
    }

    #[test]
    fn blank_lines_are_skipped_and_empty_tables_rejected() {
        let csv = "Conductivity,Seebeck\n1e5,150\n,\n";
        assert_eq!(read_measurements(csv.as_bytes(), b',').unwrap().len(), 1);

        let err = read_measurements("Conductivity,Seebeck\n".as_bytes(), b',').unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        let err = load_measurements(Path::new("definitely/not/here.csv"), b',').unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
