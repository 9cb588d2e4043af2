//! # reqsift Schema
//!
//! Feature schema layer: maps request tables of any shape onto the feature
//! space a classifier was trained on.
//!
//! ## Overview
//!
//! 1. [`read_csv`] parses an uploaded table into a typed [`RawTable`](reqsift_core::RawTable)
//! 2. [`FeatureAligner`] caps categorical cardinality, one-hot encodes and
//!    reindexes onto the [`FeatureVocabulary`]
//! 3. The resulting [`AlignedMatrix`] always has exactly one column per
//!    vocabulary entry, in vocabulary order
//!
//! ## Example
//!
//! ```rust
//! use reqsift_schema::{read_csv_bytes, FeatureAligner, FeatureVocabulary};
//!
//! let vocab = FeatureVocabulary::new(vec![
//!     "bytes".to_string(),
//!     "method_GET".to_string(),
//!     "method_POST".to_string(),
//!     "method_Other".to_string(),
//! ]).unwrap();
//!
//! let table = read_csv_bytes(b"ip,method,bytes\n1.1.1.1,GET,120\n").unwrap();
//! let aligned = FeatureAligner::new(&vocab).align(&table).unwrap();
//! assert_eq!(aligned.matrix().row(0), &[120.0, 1.0, 0.0, 0.0]);
//! ```

pub mod vocabulary;
pub mod category;
pub mod aligner;
pub mod codec;

pub use vocabulary::FeatureVocabulary;
pub use category::{CategoryCap, DEFAULT_TOP_K, OTHER_CATEGORY};
pub use aligner::{AlignedMatrix, FeatureAligner};
pub use codec::{read_csv, read_csv_bytes, to_csv_bytes, write_csv};
