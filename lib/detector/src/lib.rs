//! # reqsift Detector
//!
//! The bad-request detection pipeline.
//!
//! ```text
//! raw table ─> FeatureAligner ─> ScalerState ─> ClusterModel ─> ClusterLabelMap
//!                                                                    │
//!                               CSV <─ AnnotatedTable::filter_label <┘
//! ```
//!
//! [`ModelArtifacts`] bundles the four fitted artifacts and is validated once
//! when built. A [`Detector`] shares it through an `Arc` and processes each
//! request synchronously, with no state carried between requests.

pub mod artifacts;
pub mod export;
pub mod pipeline;

pub use artifacts::{ArtifactSummary, ModelArtifacts};
pub use export::{AnnotatedTable, DetectionSummary, LABEL_COLUMN};
pub use pipeline::Detector;
