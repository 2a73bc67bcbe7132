// Excel/ODS read (calamine) and report write (rust_xlsxwriter)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use vaudit_recon::{AuditError, ReportTable};

use crate::loader::RawSheet;

/// Read every sheet of a workbook, in workbook order, as stringified rows.
pub(crate) fn read_sheets(path: &Path) -> Result<Vec<RawSheet>, AuditError> {
    let source = path.display().to_string();
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| AuditError::load(&source, format!("failed to open workbook: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            AuditError::load(&source, format!("failed to read sheet '{sheet_name}': {e}"))
        })?;

        // Range start offset (data may not begin at A1)
        let (_, start_col) = range.start().unwrap_or((0, 0));
        let lead = start_col as usize;

        let rows = range
            .rows()
            .map(|row| {
                std::iter::repeat(None)
                    .take(lead)
                    .chain(row.iter().map(cell_text))
                    .collect()
            })
            .collect();

        sheets.push(RawSheet {
            name: sheet_name,
            rows,
        });
    }

    Ok(sheets)
}

/// Stringify one cell. Empty cells and empty strings are missing values.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(n) => Some(format_float(*n)),
        Data::Int(n) => Some(n.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Some(format!("#{:?}", e)),
        // Serial number; the audit never interprets dates.
        Data::DateTime(dt) => Some(format_float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Integers without decimals, so numeric IDs read back as `12345`.
fn format_float(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Write a report table to a single worksheet with the default sheet name:
/// bold header row, then one row per record. Missing values stay blank.
pub fn write_xlsx(table: &ReportTable, path: &Path) -> Result<(), AuditError> {
    let mut workbook = XlsxWorkbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, label) in table.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, label, &header)
            .map_err(|e| AuditError::Export(format!("failed to write header '{label}': {e}")))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let target_row = row_idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            if let Some(value) = value {
                worksheet
                    .write_string(target_row, col as u16, value)
                    .map_err(|e| AuditError::Export(format!("failed to write row {target_row}: {e}")))?;
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| AuditError::Export(format!("failed to save '{}': {e}", path.display())))?;
    log::debug!("wrote {} row(s) to {}", table.len(), path.display());
    Ok(())
}
