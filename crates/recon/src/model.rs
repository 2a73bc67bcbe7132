use serde::Serialize;

use crate::error::AuditError;

// ---------------------------------------------------------------------------
// Table roles
// ---------------------------------------------------------------------------

/// Which side of the audit a table comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    /// Reference inventory (CIQ), treated as ground truth.
    Master,
    /// Live-network site dump, merged from every sheet.
    System,
}

impl std::fmt::Display for TableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Master => write!(f, "master"),
            Self::System => write!(f, "system"),
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An ordered sequence of records sharing one column set.
///
/// Cells are optional strings: `None` is a missing value, never an empty
/// string. Column names are trimmed on construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Option<String>>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new(columns);
        table.rows = rows;
        table
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.columns.iter().position(|c| c == name)
    }

    /// Resolve a column index or fail with `MissingColumn`.
    pub fn require(&self, role: TableRole, name: &str) -> Result<usize, AuditError> {
        self.column_index(name)
            .ok_or_else(|| AuditError::missing_column(role, name.trim()))
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|v| v.as_deref())
    }

    /// Every row must carry exactly one cell per column.
    pub fn check_shape(&self, role: TableRole) -> Result<(), AuditError> {
        let width = self.columns.len();
        match self.rows.iter().position(|r| r.len() != width) {
            Some(idx) => Err(AuditError::Comparison(format!(
                "{role} table row {} has {} cell(s), expected {width}",
                idx + 1,
                self.rows[idx].len(),
            ))),
            None => Ok(()),
        }
    }

    /// Row-wise concatenation. Columns are the union of all inputs in
    /// first-seen order; a table lacking a column contributes nulls.
    pub fn concat<I>(tables: I) -> Table
    where
        I: IntoIterator<Item = Table>,
    {
        let tables: Vec<Table> = tables.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for t in &tables {
            for c in &t.columns {
                if !columns.contains(c) {
                    columns.push(c.clone());
                }
            }
        }

        let mut out = Table {
            columns,
            rows: Vec::with_capacity(tables.iter().map(|t| t.len()).sum()),
        };

        for t in tables {
            let mapping: Vec<Option<usize>> = out
                .columns
                .iter()
                .map(|c| t.column_index(c))
                .collect();
            for mut row in t.rows {
                let remapped = mapping
                    .iter()
                    .map(|src| src.and_then(|i| row.get_mut(i).and_then(Option::take)))
                    .collect();
                out.rows.push(remapped);
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Multi-sheet source
// ---------------------------------------------------------------------------

/// One sheet that contributed rows to a merged table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetInfo {
    pub name: String,
    pub rows: usize,
}

/// A multi-sheet source merged into one table, in sheet order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableSet {
    pub table: Table,
    pub sheets: Vec<SheetInfo>,
}
