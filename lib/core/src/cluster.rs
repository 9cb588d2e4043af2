//! Nearest-centroid assignment over a fitted k-means model.

use crate::distance::{squared_l2, squared_l2_difference};
use crate::{Error, Matrix, Result};
use serde::{Deserialize, Serialize};

/// Fixed set of centroids, all of the same dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClusterParams", into = "ClusterParams")]
pub struct ClusterModel {
    centroids: Matrix,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClusterParams {
    #[serde(alias = "cluster_centers_")]
    centroids: Vec<Vec<f64>>,
}

impl TryFrom<ClusterParams> for ClusterModel {
    type Error = Error;

    fn try_from(params: ClusterParams) -> Result<Self> {
        ClusterModel::new(params.centroids)
    }
}

impl From<ClusterModel> for ClusterParams {
    fn from(model: ClusterModel) -> Self {
        Self {
            centroids: model.centroids.to_rows(),
        }
    }
}

impl ClusterModel {
    pub fn new(centroids: Vec<Vec<f64>>) -> Result<Self> {
        if centroids.is_empty() {
            return Err(Error::InvalidArtifact("cluster model has no centroids".into()));
        }
        let centroids = Matrix::from_rows(centroids).map_err(|e| {
            Error::InvalidArtifact(format!("centroids differ in dimension: {}", e))
        })?;
        if centroids.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidArtifact("centroid coordinate is not finite".into()));
        }
        Ok(Self { centroids })
    }

    #[inline]
    pub fn n_clusters(&self) -> usize {
        self.centroids.n_rows()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.centroids.n_cols()
    }

    pub fn centroid(&self, id: usize) -> Option<&[f64]> {
        (id < self.n_clusters()).then(|| self.centroids.row(id))
    }

    /// Index of the closest centroid.
    ///
    /// Centroids are scanned in index order and only a strictly smaller
    /// distance replaces the current best, so ties go to the lower index.
    /// When squared distances overflow, candidates are compared through the
    /// difference of their squared distances instead.
    pub fn nearest(&self, features: &[f64]) -> Result<usize> {
        if features.len() != self.dim() {
            return Err(Error::ShapeMismatch {
                expected: self.dim(),
                actual: features.len(),
            });
        }
        if let Some(col) = features.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFinite(format!("feature {} is {}", col, features[col])));
        }

        let mut best = 0;
        let mut best_dist = squared_l2(features, self.centroids.row(0));
        for (id, centroid) in self.centroids.rows().enumerate().skip(1) {
            let dist = squared_l2(features, centroid);
            let closer = if dist.is_finite() && best_dist.is_finite() {
                dist < best_dist
            } else {
                let margin = squared_l2_difference(features, centroid, self.centroids.row(best));
                if margin.is_nan() {
                    return Err(Error::NonFinite(format!(
                        "distances to centroids {} and {} are not comparable",
                        best, id
                    )));
                }
                margin < 0.0
            };
            if closer {
                best = id;
                best_dist = dist;
            }
        }
        Ok(best)
    }

    /// Assign every row of `matrix` to a cluster, in row order.
    pub fn predict(&self, matrix: &Matrix) -> Result<Vec<usize>> {
        if matrix.n_cols() != self.dim() {
            return Err(Error::ShapeMismatch {
                expected: self.dim(),
                actual: matrix.n_cols(),
            });
        }
        matrix.rows().map(|row| self.nearest(row)).collect()
    }
}
