// CSV/TSV read and report write

use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1252};
use vaudit_recon::{AuditError, ReportTable};

use crate::loader::RawSheet;

/// Read a delimited file as one sheet named after the file stem.
/// `.tsv` is always tab-separated; other extensions are sniffed.
pub(crate) fn read_sheet(path: &Path) -> Result<RawSheet, AuditError> {
    let source = path.display().to_string();
    let content = read_text(path).map_err(|e| AuditError::load(&source, e))?;
    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
    let delimiter = if is_tsv { b'\t' } else { sniff_delimiter(&content) };

    let rows = parse_rows(&content, delimiter).map_err(|e| AuditError::load(&source, e))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string();
    Ok(RawSheet { name, rows })
}

/// Delimiters tried by the sniffer, in tie-break order.
const DELIMITERS: [u8; 4] = [b'\t', b';', b',', b'|'];

/// Non-blank lines looked at when sniffing.
const SNIFF_LINES: usize = 10;

/// Pick the delimiter whose split of the first lines best agrees with the
/// header width. Single-column files fall back to a comma.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let sample = sample.join("\n");

    DELIMITERS
        .iter()
        .enumerate()
        .filter_map(|(rank, &delim)| {
            let score = delimiter_score(&sample, delim)?;
            Some(((score, std::cmp::Reverse(rank)), delim))
        })
        .max_by_key(|&(key, _)| key)
        .map_or(b',', |(_, delim)| delim)
}

/// Header width times the number of sample records with that width, or
/// `None` when the delimiter leaves the header as a single field.
fn delimiter_score(sample: &str, delim: u8) -> Option<usize> {
    let widths: Vec<usize> = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample.as_bytes())
        .records()
        .filter_map(Result::ok)
        .map(|record| record.len())
        .collect();

    let header = *widths.first()?;
    (header > 1).then(|| header * widths.iter().filter(|&&w| w == header).count())
}

fn read_text(path: &Path) -> Result<String, String> {
    std::fs::read(path).map(|bytes| decode(&bytes)).map_err(|e| e.to_string())
}

/// A byte-order mark decides the encoding (and is dropped). Without one the
/// bytes are UTF-8 if valid, else Windows-1252 as Excel writes it.
fn decode(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return encoding.decode_without_bom_handling(&bytes[bom_len..]).0.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
    }
}

fn parse_rows(content: &str, delimiter: u8) -> Result<Vec<Vec<Option<String>>>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("record {}: {e}", line + 1))?;
        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

/// Write a report table as comma-separated text with a header row.
/// Missing values are written as empty fields.
pub fn write_csv(table: &ReportTable, path: &Path) -> Result<(), AuditError> {
    let export_err = |e: csv::Error| AuditError::Export(format!("'{}': {e}", path.display()));

    let mut writer = csv::WriterBuilder::new().from_path(path).map_err(export_err)?;
    writer.write_record(&table.columns).map_err(export_err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|v| v.as_deref().unwrap_or("")))
            .map_err(export_err)?;
    }
    writer
        .flush()
        .map_err(|e| AuditError::Export(format!("'{}': {e}", path.display())))?;
    Ok(())
}
