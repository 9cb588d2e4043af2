//! The fitted model, as one immutable value.
//!
//! Built once at startup and shared read-only (usually behind an `Arc`)
//! by every request.

use reqsift_core::{ClusterLabelMap, ClusterModel, Error, Result, ScalerState};
use reqsift_schema::FeatureVocabulary;
use serde::{Deserialize, Serialize};

/// Everything inference needs from training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArtifactParts", into = "ArtifactParts")]
pub struct ModelArtifacts {
    vocabulary: FeatureVocabulary,
    scaler: ScalerState,
    clusters: ClusterModel,
    labels: ClusterLabelMap,
}

#[derive(Serialize, Deserialize)]
struct ArtifactParts {
    vocabulary: FeatureVocabulary,
    scaler: ScalerState,
    clusters: ClusterModel,
    labels: ClusterLabelMap,
}

impl TryFrom<ArtifactParts> for ModelArtifacts {
    type Error = Error;

    fn try_from(parts: ArtifactParts) -> Result<Self> {
        ModelArtifacts::new(parts.vocabulary, parts.scaler, parts.clusters, parts.labels)
    }
}

impl From<ModelArtifacts> for ArtifactParts {
    fn from(a: ModelArtifacts) -> Self {
        Self {
            vocabulary: a.vocabulary,
            scaler: a.scaler,
            clusters: a.clusters,
            labels: a.labels,
        }
    }
}

/// Shape of the loaded model, for health checks and the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactSummary {
    pub features: usize,
    pub clusters: usize,
    pub labels: Vec<String>,
    pub frozen_categories: bool,
    /// Cluster ids the label map does not cover
    pub unlabelled_clusters: Vec<usize>,
}

impl ModelArtifacts {
    /// Check that the scaler and the centroids were fitted on the vocabulary.
    ///
    /// Label coverage is not enforced here: a cluster without a label fails
    /// the request that hits it with `UnknownCluster`.
    pub fn new(
        vocabulary: FeatureVocabulary,
        scaler: ScalerState,
        clusters: ClusterModel,
        labels: ClusterLabelMap,
    ) -> Result<Self> {
        if scaler.dim() != vocabulary.len() {
            return Err(Error::ShapeMismatch {
                expected: vocabulary.len(),
                actual: scaler.dim(),
            });
        }
        if clusters.dim() != vocabulary.len() {
            return Err(Error::ShapeMismatch {
                expected: vocabulary.len(),
                actual: clusters.dim(),
            });
        }
        if labels.is_empty() {
            return Err(Error::InvalidArtifact("cluster label map is empty".into()));
        }

        Ok(Self {
            vocabulary,
            scaler,
            clusters,
            labels,
        })
    }

    #[inline]
    pub fn vocabulary(&self) -> &FeatureVocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn scaler(&self) -> &ScalerState {
        &self.scaler
    }

    #[inline]
    pub fn clusters(&self) -> &ClusterModel {
        &self.clusters
    }

    #[inline]
    pub fn labels(&self) -> &ClusterLabelMap {
        &self.labels
    }

    /// Cluster ids with no entry in the label map
    pub fn unlabelled_clusters(&self) -> Vec<usize> {
        (0..self.clusters.n_clusters())
            .filter(|&id| self.labels.label(id).is_err())
            .collect()
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            features: self.vocabulary.len(),
            clusters: self.clusters.n_clusters(),
            labels: self
                .labels
                .distinct_labels()
                .into_iter()
                .map(str::to_string)
                .collect(),
            frozen_categories: self.vocabulary.has_frozen_categories(),
            unlabelled_clusters: self.unlabelled_clusters(),
        }
    }
}
