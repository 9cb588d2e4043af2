//! # reqsift
//!
//! Flags bad HTTP requests in an uploaded table using a k-means model
//! trained offline.
//!
//! Each request table goes through the same fixed pipeline:
//!
//! 1. **Align**: cap categorical cardinality to the top 20 values, one-hot
//!    encode, reindex onto the trained feature vocabulary
//! 2. **Scale**: apply the fitted `(x - mean) / scale`
//! 3. **Cluster**: nearest centroid, ties to the lower index
//! 4. **Label**: cluster id to label, unknown ids are an error
//! 5. **Export**: keep rows labelled `bad`, write them as CSV
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! reqsift serve --artifacts-dir ./model --http-port 8000
//! curl -F file=@requests.csv http://localhost:8000/predict-bad/ -o bad_requests.csv
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use reqsift::prelude::*;
//! use std::sync::Arc;
//!
//! let artifacts = ArtifactStore::new("./model").load().unwrap();
//! let detector = Detector::new(Arc::new(artifacts));
//! let bad_csv = detector.detect_csv(b"ip,method,bytes\n9.9.9.9,POST,50000\n").unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - `reqsift-core` - typed tables, matrices, scaler, cluster model, label map
//! - `reqsift-schema` - feature vocabulary, category capping, alignment, CSV codec
//! - `reqsift-detector` - model artifacts and the detection pipeline
//! - `reqsift-storage` - loading and saving artifacts
//! - `reqsift-api` - REST API

// Re-export core types
pub use reqsift_core::{
    ClusterLabelMap, ClusterModel, ColumnKind, Error, Matrix, RawTable, Result, ScalerState,
    Value, DEFAULT_ANOMALOUS_LABEL,
};

// Re-export schema
pub use reqsift_schema::{
    read_csv, read_csv_bytes, to_csv_bytes, write_csv, AlignedMatrix, CategoryCap,
    FeatureAligner, FeatureVocabulary, DEFAULT_TOP_K, OTHER_CATEGORY,
};

// Re-export the pipeline
pub use reqsift_detector::{
    AnnotatedTable, ArtifactSummary, DetectionSummary, Detector, ModelArtifacts, LABEL_COLUMN,
};

// Re-export storage
pub use reqsift_storage::ArtifactStore;

// Re-export API
pub use reqsift_api::{ApiConfig, ApiError, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnnotatedTable, ApiConfig, ArtifactStore, ClusterLabelMap, ClusterModel, Detector, Error,
        FeatureAligner, FeatureVocabulary, ModelArtifacts, RawTable, RestApi, Result,
        ScalerState, Value,
    };
}
