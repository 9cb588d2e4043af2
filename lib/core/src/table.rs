use crate::{Error, Result, Value};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// How a column takes part in feature encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every present cell is a number or a boolean. Passed through as-is.
    Numeric,
    /// At least one cell is text. One-hot encoded.
    Categorical,
}

/// An ordered table of dynamically typed cells.
///
/// Columns are not known ahead of time; every request may bring its own set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParams")]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct TableParams {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TryFrom<TableParams> for RawTable {
    type Error = Error;

    fn try_from(params: TableParams) -> Result<Self> {
        RawTable::from_rows(params.columns, params.rows)
    }
}

impl RawTable {
    /// Create an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(Error::Schema(format!("duplicate column '{}'", name)));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Build a table from a header and its rows
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Self::new(columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Build a table from JSON objects. Columns appear in first-seen order;
    /// keys absent from a record become missing cells.
    pub fn from_records(records: &[serde_json::Map<String, serde_json::Value>]) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        let mut seen = AHashSet::new();
        for record in records {
            for key in record.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).map(Value::from_json).unwrap_or(Value::Missing))
                    .collect()
            })
            .collect();

        Self::from_rows(columns, rows)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Schema(format!(
                "row {} has {} cells, header has {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Infer the encoding kind of a column from its cells.
    /// A column with no present cells is numeric.
    pub fn column_kind(&self, index: usize) -> ColumnKind {
        if self.column_values(index).any(|v| matches!(v, Value::Text(_))) {
            ColumnKind::Categorical
        } else {
            ColumnKind::Numeric
        }
    }

    /// Keep the rows flagged in `keep`, in table order.
    pub fn select_rows(&self, keep: &[bool]) -> Self {
        let rows = self
            .rows
            .iter()
            .zip(keep.iter())
            .filter(|(_, k)| **k)
            .map(|(row, _)| row.clone())
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}
