//! Annotated tables and their CSV export.

use reqsift_core::{RawTable, Result, Value};
use reqsift_schema::to_csv_bytes;
use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the derived column carrying each row's label
pub const LABEL_COLUMN: &str = "Predicted_Label";

/// Request rows with one predicted label each, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTable {
    table: RawTable,
    labels: Vec<String>,
}

/// Label counts over one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionSummary {
    pub total: usize,
    pub anomalous: usize,
    pub anomalous_label: String,
    pub labels: BTreeMap<String, usize>,
}

impl AnnotatedTable {
    /// Pair a table with its labels. Both must have the same length.
    pub(crate) fn new(table: RawTable, labels: Vec<String>) -> Self {
        debug_assert_eq!(table.len(), labels.len());
        Self { table, labels }
    }

    #[inline]
    pub fn table(&self) -> &RawTable {
        &self.table
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Rows labelled `label`, in input order. `self` is left as is.
    pub fn filter_label(&self, label: &str) -> AnnotatedTable {
        let keep: Vec<bool> = self.labels.iter().map(|l| l == label).collect();
        let labels = self
            .labels
            .iter()
            .filter(|l| l.as_str() == label)
            .cloned()
            .collect();
        AnnotatedTable {
            table: self.table.select_rows(&keep),
            labels,
        }
    }

    /// Row count per label
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.labels {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self, anomalous_label: &str) -> DetectionSummary {
        let labels = self.label_counts();
        DetectionSummary {
            total: self.len(),
            anomalous: labels.get(anomalous_label).copied().unwrap_or(0),
            anomalous_label: anomalous_label.to_string(),
            labels,
        }
    }

    /// The original columns followed by [`LABEL_COLUMN`]. An input column
    /// already named [`LABEL_COLUMN`] is overwritten in place.
    pub fn to_table(&self) -> Result<RawTable> {
        let existing = self.table.column_index(LABEL_COLUMN);

        let mut columns = self.table.columns().to_vec();
        if existing.is_none() {
            columns.push(LABEL_COLUMN.to_string());
        }

        let rows = self
            .table
            .rows()
            .iter()
            .zip(&self.labels)
            .map(|(row, label)| {
                let mut row = row.clone();
                let cell = Value::Text(label.clone());
                match existing {
                    Some(idx) => row[idx] = cell,
                    None => row.push(cell),
                }
                row
            })
            .collect();

        RawTable::from_rows(columns, rows)
    }

    /// Serialize as CSV, label column included
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        to_csv_bytes(&self.to_table()?)
    }
}
