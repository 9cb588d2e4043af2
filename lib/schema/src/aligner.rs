//! Feature alignment
//!
//! Turns a request table of arbitrary shape into a matrix whose columns are
//! exactly the trained vocabulary, in vocabulary order:
//!
//! 1. cap every categorical column to its retained category set,
//! 2. one-hot encode categorical columns as `<column>_<value>`,
//! 3. reindex onto the vocabulary, zero-filling absent features and dropping
//!    features the model never saw.

use crate::category::{CategoryCap, DEFAULT_TOP_K};
use crate::vocabulary::FeatureVocabulary;
use ahash::AHashSet;
use reqsift_core::{ColumnKind, Error, Matrix, RawTable, Result, Value};
use tracing::debug;

/// Feature matrix laid out in vocabulary order
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedMatrix<'v> {
    columns: &'v [String],
    matrix: Matrix,
}

impl<'v> AlignedMatrix<'v> {
    #[inline]
    pub fn columns(&self) -> &'v [String] {
        self.columns
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    #[inline]
    pub fn into_matrix(self) -> Matrix {
        self.matrix
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.matrix.n_rows()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.matrix.n_cols()
    }

    /// Value of a named feature in one row
    pub fn feature(&self, row: usize, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|col| self.matrix.get(row, col))
    }
}

/// Encodes request tables into a fixed vocabulary
#[derive(Debug, Clone)]
pub struct FeatureAligner<'v> {
    vocabulary: &'v FeatureVocabulary,
    top_k: usize,
}

impl<'v> FeatureAligner<'v> {
    pub fn new(vocabulary: &'v FeatureVocabulary) -> Self {
        Self {
            vocabulary,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override how many categories are kept per column when the vocabulary
    /// has no frozen set for it
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn vocabulary(&self) -> &'v FeatureVocabulary {
        self.vocabulary
    }

    pub fn align(&self, table: &RawTable) -> Result<AlignedMatrix<'v>> {
        if table.is_empty() {
            return Err(Error::Schema("input table has no rows".into()));
        }

        let mut matrix = Matrix::zeros(table.len(), self.vocabulary.len());
        let mut dropped: AHashSet<String> = AHashSet::new();

        for (col, name) in table.columns().iter().enumerate() {
            match table.column_kind(col) {
                ColumnKind::Numeric => match self.vocabulary.index_of(name) {
                    Some(feature) => {
                        for (row, value) in table.column_values(col).enumerate() {
                            let x = numeric_cell(value);
                            if !x.is_finite() {
                                return Err(Error::Schema(format!(
                                    "column '{}' row {} is not a finite number: {}",
                                    name,
                                    row + 1,
                                    x
                                )));
                            }
                            matrix.set(row, feature, x);
                        }
                    }
                    None => {
                        dropped.insert(name.clone());
                    }
                },
                ColumnKind::Categorical => {
                    let keys: Vec<Option<String>> =
                        table.column_values(col).map(Value::category_key).collect();
                    let cap = self.cap_for(name, &keys);

                    for (row, key) in keys.iter().enumerate() {
                        let indicator = format!("{}_{}", name, cap.apply(key.as_deref()));
                        match self.vocabulary.index_of(&indicator) {
                            Some(feature) => matrix.set(row, feature, 1.0),
                            None => {
                                dropped.insert(indicator);
                            }
                        }
                    }
                }
            }
        }

        debug!(
            rows = table.len(),
            input_columns = table.num_columns(),
            features = self.vocabulary.len(),
            dropped = dropped.len(),
            "aligned request table"
        );

        Ok(AlignedMatrix {
            columns: self.vocabulary.columns(),
            matrix,
        })
    }

    fn cap_for(&self, column: &str, keys: &[Option<String>]) -> CategoryCap {
        match self.vocabulary.frozen_categories(column) {
            Some(values) => CategoryCap::frozen(values),
            None => CategoryCap::from_frequencies(keys, self.top_k),
        }
    }
}

/// Numeric columns pass through; missing cells are zero-filled like absent
/// features.
#[inline]
fn numeric_cell(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::OTHER_CATEGORY;
    use std::collections::BTreeMap;

    fn vocab(columns: &[&str]) -> FeatureVocabulary {
        FeatureVocabulary::new(columns.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> RawTable {
        RawTable::from_rows(columns.iter().map(|s| s.to_string()).collect(), rows).unwrap()
    }

    #[test]
    fn test_align_request_table() {
        let vocab = vocab(&["bytes", "method_GET", "method_POST", "method_Other"]);
        let t = table(
            &["ip", "method", "bytes"],
            vec![
                vec!["1.1.1.1".into(), "GET".into(), 120i64.into()],
                vec!["9.9.9.9".into(), "POST".into(), 50000i64.into()],
            ],
        );

        let aligned = FeatureAligner::new(&vocab).align(&t).unwrap();
        assert_eq!(aligned.columns(), vocab.columns());
        assert_eq!(aligned.matrix().row(0), &[120.0, 1.0, 0.0, 0.0]);
        assert_eq!(aligned.matrix().row(1), &[50000.0, 0.0, 1.0, 0.0]);
        assert_eq!(aligned.feature(1, "method_POST"), Some(1.0));
    }

    #[test]
    fn test_absent_features_zero_filled() {
        let vocab = vocab(&["status", "bytes", "proto_HTTP/2"]);
        let t = table(&["bytes"], vec![vec![10i64.into()], vec![Value::Missing]]);

        let aligned = FeatureAligner::new(&vocab).align(&t).unwrap();
        assert_eq!(aligned.n_cols(), 3);
        assert_eq!(aligned.matrix().row(0), &[0.0, 10.0, 0.0]);
        assert_eq!(aligned.matrix().row(1), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_finite_cells_rejected() {
        let vocab = vocab(&["bytes"]);
        for bad in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let t = table(&["bytes"], vec![vec![10i64.into()], vec![bad.into()]]);
            match FeatureAligner::new(&vocab).align(&t) {
                Err(Error::Schema(msg)) => assert!(msg.contains("'bytes' row 2"), "{}", msg),
                other => panic!("expected schema error, got {:?}", other),
            }
        }

        // columns the model never sees are dropped before the check
        let t = table(&["bytes", "extra"], vec![vec![1i64.into(), f64::NAN.into()]]);
        assert!(FeatureAligner::new(&vocab).align(&t).is_ok());
    }

    #[test]
    fn test_empty_table_is_schema_error() {
        let vocab = vocab(&["bytes"]);
        let t = table(&["bytes"], vec![]);
        assert!(matches!(FeatureAligner::new(&vocab).align(&t), Err(Error::Schema(_))));
    }

    #[test]
    fn test_unseen_and_missing_categories_go_to_other() {
        let vocab = vocab(&["method_GET", "method_Other"]);
        let t = table(
            &["method"],
            vec![vec!["GET".into()], vec!["DELETE".into()], vec![Value::Missing]],
        );

        // DELETE is within the top-k of this request, so it is encoded as
        // method_DELETE and dropped; the missing cell becomes method_Other.
        let aligned = FeatureAligner::new(&vocab).align(&t).unwrap();
        assert_eq!(aligned.matrix().row(0), &[1.0, 0.0]);
        assert_eq!(aligned.matrix().row(1), &[0.0, 0.0]);
        assert_eq!(aligned.matrix().row(2), &[0.0, 1.0]);
    }

    #[test]
    fn test_top_k_boundary() {
        let vocab = vocab(&["path_/p0", "path_/p20", "path_Other"]);
        // /p0 is the most frequent, /p20 is the 21st distinct value
        let mut rows: Vec<Vec<Value>> = vec![vec!["/p0".into()]; 3];
        rows.extend((1..=20).map(|i| vec![Value::from(format!("/p{}", i))]));

        let aligned = FeatureAligner::new(&vocab).align(&table(&["path"], rows)).unwrap();
        let last = aligned.n_rows() - 1;
        assert_eq!(aligned.matrix().row(0), &[1.0, 0.0, 0.0]);
        assert_eq!(aligned.matrix().row(last), &[0.0, 0.0, 1.0]);
        assert_eq!(aligned.feature(last, &format!("path_{}", OTHER_CATEGORY)), Some(1.0));
    }

    #[test]
    fn test_frozen_categories_ignore_batch_composition() {
        let mut categories = BTreeMap::new();
        categories.insert("method".to_string(), vec!["GET".to_string()]);
        let vocab = FeatureVocabulary::with_categories(
            vec!["method_GET".into(), "method_POST".into(), "method_Other".into()],
            categories,
        )
        .unwrap();

        let t = table(&["method"], vec![vec!["POST".into()], vec!["GET".into()]]);
        let aligned = FeatureAligner::new(&vocab).align(&t).unwrap();
        assert_eq!(aligned.matrix().row(0), &[0.0, 0.0, 1.0]);
        assert_eq!(aligned.matrix().row(1), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_numbers_in_text_column_are_categories() {
        let vocab = vocab(&["port_80", "port_Other"]);
        let t = table(&["port"], vec![vec![80i64.into()], vec!["ssh".into()]]);
        let aligned = FeatureAligner::new(&vocab).with_top_k(1).align(&t).unwrap();
        assert_eq!(aligned.matrix().row(0), &[1.0, 0.0]);
        assert_eq!(aligned.matrix().row(1), &[0.0, 1.0]);
    }

    #[test]
    fn test_booleans_are_numeric() {
        let vocab = vocab(&["is_tls"]);
        let t = table(&["is_tls"], vec![vec![true.into()], vec![false.into()]]);
        let aligned = FeatureAligner::new(&vocab).align(&t).unwrap();
        assert_eq!(aligned.matrix().as_slice(), &[1.0, 0.0]);
    }
}
