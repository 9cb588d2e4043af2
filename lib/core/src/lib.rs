//! # reqsift Core
//!
//! Core library for the reqsift request classifier.
//!
//! This crate provides the typed building blocks of the inference pipeline:
//!
//! - [`RawTable`] - Ordered rows of explicitly tagged [`Value`]s
//! - [`Matrix`] - Dense feature matrix
//! - [`ScalerState`] - Pre-fitted standardization
//! - [`ClusterModel`] - Nearest-centroid assignment
//! - [`ClusterLabelMap`] - Cluster id to semantic label
//!
//! ## Example
//!
//! ```rust
//! use reqsift_core::{ClusterLabelMap, ClusterModel, Matrix, ScalerState};
//!
//! let scaler = ScalerState::new(vec![100.0, 0.0], vec![50.0, 1.0]).unwrap();
//! let model = ClusterModel::new(vec![vec![0.0, 0.0], vec![5.0, 1.0]]).unwrap();
//! let labels = ClusterLabelMap::new([(0, "good"), (1, "bad")]);
//!
//! let features = Matrix::from_rows(vec![vec![110.0, 0.0], vec![400.0, 1.0]]).unwrap();
//! let scaled = scaler.transform(&features).unwrap();
//! let clusters = model.predict(&scaled).unwrap();
//! assert_eq!(labels.map_all(&clusters).unwrap(), vec!["good", "bad"]);
//! ```

pub mod error;
pub mod value;
pub mod table;
pub mod matrix;
pub mod scaler;
pub mod cluster;
pub mod labels;

/// Distance kernels used by the cluster classifier
pub mod distance;

pub use error::{Error, Result};
pub use value::Value;
pub use table::{ColumnKind, RawTable};
pub use matrix::Matrix;
pub use scaler::ScalerState;
pub use cluster::ClusterModel;
pub use labels::{ClusterLabelMap, DEFAULT_ANOMALOUS_LABEL};
