use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural problems with a nutrition table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("malformed dataset: missing required column '{0}'")]
    MissingColumn(String),

    #[error("malformed dataset: row {row} has {found} cells but the header has {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. Numeric columns may still hold `Text` or
/// `Missing` when the source data is dirty; numeric filters never match those.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    /// Parse a raw text cell: empty and NaN markers are missing, numbers are
    /// numbers, everything else is kept as text.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() || matches!(s, "NaN" | "nan" | "NA" | "null") {
            return CellValue::Missing;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_nan() => CellValue::Missing,
            Ok(v) => CellValue::Number(v),
            Err(_) => CellValue::Text(s.to_string()),
        }
    }

    /// The numeric value, if this cell holds a real number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Text used for categorical matching (company names).
    pub fn label(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(_) => Some(self.to_string()),
            CellValue::Missing => None,
        }
    }

    /// Round numeric cells to whole numbers, ties to even.
    pub fn rounded(self) -> Self {
        match self {
            CellValue::Number(v) => CellValue::Number(v.round_ties_even()),
            other => other,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            // adding 0.0 turns -0.0 into 0.0
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{:.0}", v + 0.0)
            }
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Missing => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// MenuItem – one row of the table
// ---------------------------------------------------------------------------

/// A single menu item: one cell per table column, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub cells: Vec<CellValue>,
}

impl MenuItem {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&CellValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// NutritionTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded dataset. Immutable once built; filters only ever borrow it.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionTable {
    columns: Vec<String>,
    rows: Vec<MenuItem>,
}

impl NutritionTable {
    /// Build a table, checking that every row matches the header width.
    pub fn new(columns: Vec<String>, rows: Vec<MenuItem>) -> Result<Self, DatasetError> {
        let expected = columns.len();
        if let Some((row, item)) = rows
            .iter()
            .enumerate()
            .find(|(_, item)| item.cells.len() != expected)
        {
            return Err(DatasetError::RowWidth {
                row,
                found: item.cells.len(),
                expected,
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[MenuItem] {
        &self.rows
    }

    /// Number of menu items.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the header.
    pub fn column_index(&self, name: &str) -> Result<usize, DatasetError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    /// Fail with the first absent column, if any.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), DatasetError> {
        names
            .iter()
            .try_for_each(|name| self.column_index(name).map(|_| ()))
    }

    /// Distinct labels of a column in order of first appearance.
    pub fn unique_labels(&self, column: &str) -> Result<Vec<String>, DatasetError> {
        let idx = self.column_index(column)?;
        let mut seen = BTreeSet::new();
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.cell(idx).label())
            .filter(|label| seen.insert(label.clone()))
            .collect())
    }

    /// Smallest and largest numeric value of a column, ignoring missing and
    /// non-numeric cells. `None` if the column has no numbers at all.
    pub fn numeric_bounds(&self, column: &str) -> Result<Option<(f64, f64)>, DatasetError> {
        let idx = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.cell(idx).as_f64())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            }))
    }

    /// A selection containing every row.
    pub fn select_all(&self) -> Selection<'_> {
        Selection {
            table: self,
            indices: (0..self.rows.len()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection – a filtered view of a table
// ---------------------------------------------------------------------------

/// Ordered subset of a table's rows. This is what filters consume and produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    table: &'a NutritionTable,
    indices: Vec<usize>,
}

impl<'a> Selection<'a> {
    /// View of `table` restricted to `indices`. Out-of-range indices are dropped.
    pub fn from_indices(table: &'a NutritionTable, indices: Vec<usize>) -> Self {
        let indices = indices.into_iter().filter(|&i| i < table.len()).collect();
        Self { table, indices }
    }

    pub fn table(&self) -> &'a NutritionTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Selected rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &'a MenuItem> + '_ {
        let rows = self.table.rows();
        self.indices.iter().map(move |&i| &rows[i])
    }

    /// Keep only the rows satisfying `keep`, preserving order.
    pub(crate) fn retain(self, mut keep: impl FnMut(&MenuItem) -> bool) -> Self {
        let rows = self.table.rows();
        let indices = self
            .indices
            .into_iter()
            .filter(|&i| keep(&rows[i]))
            .collect();
        Self {
            table: self.table,
            indices,
        }
    }
}
