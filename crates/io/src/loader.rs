// Table Loader: master (single table) + system (all sheets merged)

use std::path::Path;

use vaudit_recon::{AuditError, AuditSession, SheetInfo, Table, TableSet};

use crate::{csv, xlsx};

/// Source format, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Delimited,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, AuditError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" | "tsv" | "txt" => Ok(Self::Delimited),
            "" => Err(AuditError::load(path.display().to_string(), "file has no extension")),
            other => Err(AuditError::load(
                path.display().to_string(),
                format!("unsupported file type '.{other}'"),
            )),
        }
    }
}

/// One raw sheet: its name and its rows of stringified cells.
pub(crate) struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Header row → column names: trimmed, blanks become `Unnamed: <i>`,
/// repeats get `.1`, `.2`, ... suffixes.
pub(crate) fn header_names(cells: &[Option<String>]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let base = match cell.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => format!("Unnamed: {i}"),
        };
        let mut name = base.clone();
        let mut n = 1;
        while names.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        names.push(name);
    }
    names
}

/// First row is the header; fully empty data rows are skipped; short rows
/// are padded, long rows cut to the header width.
/// Returns `None` when the sheet has no header row at all.
pub(crate) fn sheet_to_table(sheet: RawSheet) -> Option<Table> {
    let mut rows = sheet.rows.into_iter();
    let header = loop {
        let row = rows.next()?;
        if row.iter().any(Option::is_some) {
            break row;
        }
    };

    let columns = header_names(&header);
    let width = columns.len();
    let mut table = Table::new(&columns);

    let mut truncated = 0usize;
    for mut row in rows {
        if row.iter().all(Option::is_none) {
            continue;
        }
        if row.len() > width {
            if row[width..].iter().any(Option::is_some) {
                truncated += 1;
            }
            row.truncate(width);
        }
        row.resize(width, None);
        table.push_row(row);
    }

    if truncated > 0 {
        log::warn!(
            "sheet '{}': {truncated} row(s) had cells beyond the header; extra cells dropped",
            sheet.name
        );
    }
    Some(table)
}

fn read_sheets(path: &Path) -> Result<Vec<RawSheet>, AuditError> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Workbook => xlsx::read_sheets(path),
        SourceFormat::Delimited => csv::read_sheet(path).map(|s| vec![s]),
    }
}

/// Load the single-table source (first sheet of a workbook).
pub fn load_table(path: &Path) -> Result<Table, AuditError> {
    let source = path.display().to_string();
    let first = read_sheets(path)?
        .into_iter()
        .next()
        .ok_or_else(|| AuditError::load(&source, "workbook contains no sheets"))?;
    let name = first.name.clone();
    let table = sheet_to_table(first)
        .ok_or_else(|| AuditError::load(&source, format!("sheet '{name}' has no header row")))?;

    log::debug!("loaded {source}: {} rows x {} columns", table.len(), table.columns().len());
    Ok(table)
}

/// Load every sheet of the multi-table source and concatenate them in
/// sheet order.
pub fn load_table_set(path: &Path) -> Result<TableSet, AuditError> {
    let source = path.display().to_string();
    let raw = read_sheets(path)?;
    if raw.is_empty() {
        return Err(AuditError::load(&source, "workbook contains no sheets"));
    }

    let mut sheets = Vec::new();
    let mut tables = Vec::new();
    for sheet in raw {
        let name = sheet.name.clone();
        match sheet_to_table(sheet) {
            Some(table) => {
                sheets.push(SheetInfo {
                    name,
                    rows: table.len(),
                });
                tables.push(table);
            }
            None => log::warn!("{source}: sheet '{name}' is empty; skipped"),
        }
    }

    if tables.is_empty() {
        return Err(AuditError::load(&source, "every sheet is empty"));
    }

    let table = Table::concat(tables);
    log::debug!(
        "loaded {source}: {} sheet(s) merged into {} rows x {} columns",
        sheets.len(),
        table.len(),
        table.columns().len()
    );
    Ok(TableSet { table, sheets })
}

/// Load both sources into a fresh session. Any load failure aborts before
/// a session exists.
pub fn load_session(master: &Path, system: &Path) -> Result<AuditSession, AuditError> {
    let master = load_table(master)?;
    let system = load_table_set(system)?;
    Ok(AuditSession::new(master, system))
}
