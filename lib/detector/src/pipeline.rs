use crate::artifacts::ModelArtifacts;
use crate::export::{AnnotatedTable, DetectionSummary};
use reqsift_core::{RawTable, Result, DEFAULT_ANOMALOUS_LABEL};
use reqsift_schema::{read_csv_bytes, FeatureAligner, DEFAULT_TOP_K};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs request tables through align → scale → cluster → label.
///
/// Holds no per-request state; one detector serves any number of requests.
#[derive(Debug, Clone)]
pub struct Detector {
    artifacts: Arc<ModelArtifacts>,
    anomalous_label: String,
    top_k: usize,
}

impl Detector {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self::with_anomalous_label(artifacts, DEFAULT_ANOMALOUS_LABEL)
    }

    pub fn with_anomalous_label(artifacts: Arc<ModelArtifacts>, label: impl Into<String>) -> Self {
        let anomalous_label = label.into();
        if !artifacts.labels().contains_label(&anomalous_label) {
            warn!(
                label = %anomalous_label,
                "anomalous label is not produced by any cluster; nothing will be flagged"
            );
        }
        Self {
            artifacts,
            anomalous_label,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Categories kept per column when the vocabulary has no frozen set
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[inline]
    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    #[inline]
    pub fn anomalous_label(&self) -> &str {
        &self.anomalous_label
    }

    /// Cluster id of every row, in row order
    pub fn classify(&self, table: &RawTable) -> Result<Vec<usize>> {
        let aligned = FeatureAligner::new(self.artifacts.vocabulary())
            .with_top_k(self.top_k)
            .align(table)?;
        let scaled = self.artifacts.scaler().transform(aligned.matrix())?;
        let clusters = self.artifacts.clusters().predict(&scaled)?;
        debug!(rows = clusters.len(), "assigned clusters");
        Ok(clusters)
    }

    /// Every row with its label. Fails as a whole if any row cannot be labelled.
    pub fn annotate(&self, table: &RawTable) -> Result<AnnotatedTable> {
        let clusters = self.classify(table)?;
        let labels = self.artifacts.labels().map_all(&clusters)?;
        Ok(AnnotatedTable::new(table.clone(), labels))
    }

    /// Only the rows labelled anomalous
    pub fn detect(&self, table: &RawTable) -> Result<AnnotatedTable> {
        let annotated = self.annotate(table)?;
        let flagged = annotated.filter_label(&self.anomalous_label);
        debug!(
            rows = annotated.len(),
            flagged = flagged.len(),
            label = %self.anomalous_label,
            "filtered anomalous rows"
        );
        Ok(flagged)
    }

    pub fn summarize(&self, table: &RawTable) -> Result<DetectionSummary> {
        Ok(self.annotate(table)?.summary(&self.anomalous_label))
    }

    /// CSV in, anomalous rows as CSV out
    pub fn detect_csv(&self, input: &[u8]) -> Result<Vec<u8>> {
        let table = read_csv_bytes(input)?;
        self.detect(&table)?.to_csv()
    }

    pub fn summarize_csv(&self, input: &[u8]) -> Result<DetectionSummary> {
        let table = read_csv_bytes(input)?;
        self.summarize(&table)
    }

    /// CSV in, every row with its label as CSV out
    pub fn annotate_csv(&self, input: &[u8]) -> Result<Vec<u8>> {
        let table = read_csv_bytes(input)?;
        self.annotate(&table)?.to_csv()
    }
}
