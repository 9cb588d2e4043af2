//! Standard scaling with parameters fitted offline.
//!
//! Inference never refits: every request goes through the same affine map
//! `(x - mean) / scale`, so equal inputs always land on equal features.

use crate::{Error, Matrix, Result};
use serde::{Deserialize, Serialize};

/// Fitted standardization parameters, one `(mean, scale)` pair per feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScalerParams", into = "ScalerParams")]
pub struct ScalerState {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// On-disk form. Accepts the attribute names of a fitted scikit-learn scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    #[serde(alias = "mean_")]
    mean: Vec<f64>,
    #[serde(alias = "scale_")]
    scale: Vec<f64>,
}

impl TryFrom<ScalerParams> for ScalerState {
    type Error = Error;

    fn try_from(params: ScalerParams) -> Result<Self> {
        ScalerState::new(params.mean, params.scale)
    }
}

impl From<ScalerState> for ScalerParams {
    fn from(state: ScalerState) -> Self {
        Self {
            mean: state.mean,
            scale: state.scale,
        }
    }
}

impl ScalerState {
    /// Zero scales mark constant features and are replaced by 1.
    pub fn new(mean: Vec<f64>, mut scale: Vec<f64>) -> Result<Self> {
        if mean.len() != scale.len() {
            return Err(Error::InvalidArtifact(format!(
                "scaler has {} means but {} scales",
                mean.len(),
                scale.len()
            )));
        }
        if let Some(i) = mean.iter().chain(scale.iter()).position(|v| !v.is_finite()) {
            return Err(Error::InvalidArtifact(format!(
                "scaler parameter {} is not finite",
                i
            )));
        }
        for s in &mut scale {
            if *s == 0.0 {
                *s = 1.0;
            }
        }
        Ok(Self { mean, scale })
    }

    /// The transform that leaves every feature unchanged
    #[must_use]
    pub fn identity(dim: usize) -> Self {
        Self {
            mean: vec![0.0; dim],
            scale: vec![1.0; dim],
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Standardize every row of `matrix`. The input is left untouched.
    /// Fails with [`Error::NonFinite`] when a scaled value overflows.
    pub fn transform(&self, matrix: &Matrix) -> Result<Matrix> {
        if matrix.n_cols() != self.dim() {
            return Err(Error::ShapeMismatch {
                expected: self.dim(),
                actual: matrix.n_cols(),
            });
        }

        let mut out = matrix.clone();
        for r in 0..out.n_rows() {
            self.transform_row(out.row_mut(r));
            if let Some(col) = out.row(r).iter().position(|x| !x.is_finite()) {
                return Err(Error::NonFinite(format!(
                    "row {} feature {} overflowed when scaled",
                    r + 1,
                    col
                )));
            }
        }
        Ok(out)
    }

    #[inline]
    fn transform_row(&self, row: &mut [f64]) {
        for ((x, mean), scale) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
            *x = (*x - mean) / scale;
        }
    }
}
