//! Feature vocabulary definitions
//!
//! The vocabulary is the ordered list of feature columns the classifier was
//! fitted on: numeric columns under their own name and one-hot indicators
//! named `<column>_<value>`. It may also carry the category sets captured at
//! training time, one per categorical column.

use ahash::AHashMap;
use reqsift_core::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Immutable, ordered feature space
#[derive(Debug, Clone)]
pub struct FeatureVocabulary {
    columns: Vec<String>,
    index: AHashMap<String, usize>,
    categories: BTreeMap<String, Vec<String>>,
}

/// Full on-disk form
#[derive(Serialize, Deserialize)]
struct VocabularyParams {
    columns: Vec<String>,
    #[serde(default)]
    categories: BTreeMap<String, Vec<String>>,
}

/// JSON also accepts a bare list of column names
#[derive(Deserialize)]
#[serde(untagged)]
enum VocabularyRepr {
    List(Vec<String>),
    Full(VocabularyParams),
}

impl FeatureVocabulary {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        Self::with_categories(columns, BTreeMap::new())
    }

    /// Vocabulary with frozen category sets. For a column listed in
    /// `categories` those values are kept and every other value becomes
    /// `Other`, whatever the request's own frequencies are.
    pub fn with_categories(
        columns: Vec<String>,
        categories: BTreeMap<String, Vec<String>>,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::InvalidArtifact("feature vocabulary is empty".into()));
        }

        let mut index = AHashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(Error::InvalidArtifact(format!(
                    "feature '{}' appears twice in the vocabulary",
                    name
                )));
            }
        }

        Ok(Self {
            columns,
            index,
            categories,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn index_of(&self, feature: &str) -> Option<usize> {
        self.index.get(feature).copied()
    }

    /// Training-time category set of a column, if one was captured
    pub fn frozen_categories(&self, column: &str) -> Option<&[String]> {
        self.categories.get(column).map(Vec::as_slice)
    }

    pub fn has_frozen_categories(&self) -> bool {
        !self.categories.is_empty()
    }
}

impl PartialEq for FeatureVocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.categories == other.categories
    }
}

impl Serialize for FeatureVocabulary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        VocabularyParams {
            columns: self.columns.clone(),
            categories: self.categories.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FeatureVocabulary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let params = if deserializer.is_human_readable() {
            match VocabularyRepr::deserialize(deserializer)? {
                VocabularyRepr::List(columns) => VocabularyParams {
                    columns,
                    categories: BTreeMap::new(),
                },
                VocabularyRepr::Full(params) => params,
            }
        } else {
            VocabularyParams::deserialize(deserializer)?
        };
        FeatureVocabulary::with_categories(params.columns, params.categories)
            .map_err(D::Error::custom)
    }
}
