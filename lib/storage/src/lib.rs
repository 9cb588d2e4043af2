//! Artifact persistence for reqsift.

pub mod store;

pub use store::{
    ArtifactStore, BUNDLE_FILE, FEATURE_COLUMNS_FILE, KMEANS_FILE, LABEL_MAP_FILE, SCALER_FILE,
};
