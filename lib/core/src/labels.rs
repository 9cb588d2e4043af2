use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Label given to clusters of suspicious requests unless configured otherwise
pub const DEFAULT_ANOMALOUS_LABEL: &str = "bad";

/// Maps cluster ids to semantic labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterLabelMap {
    #[serde(deserialize_with = "deserialize_labels")]
    labels: BTreeMap<usize, String>,
}

/// Labels may be stored as strings or as small integers in JSON.
/// Binary formats always carry strings.
fn deserialize_labels<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<usize, String>, D::Error>
where
    D: Deserializer<'de>,
{
    if !deserializer.is_human_readable() {
        return BTreeMap::<usize, String>::deserialize(deserializer);
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Int(i64),
    }

    let raw = BTreeMap::<usize, Label>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(id, label)| {
            let label = match label {
                Label::Text(s) => s,
                Label::Int(i) => i.to_string(),
            };
            (id, label)
        })
        .collect())
}

impl ClusterLabelMap {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        Self {
            labels: entries.into_iter().map(|(id, s)| (id, s.into())).collect(),
        }
    }

    /// Label of one cluster. An unmapped id means the model and the map are
    /// out of sync, so there is no fallback.
    pub fn label(&self, cluster: usize) -> Result<&str> {
        self.labels
            .get(&cluster)
            .map(String::as_str)
            .ok_or(Error::UnknownCluster(cluster))
    }

    /// Labels for a sequence of cluster ids, in the same order
    pub fn map_all(&self, clusters: &[usize]) -> Result<Vec<String>> {
        clusters
            .iter()
            .map(|&c| self.label(c).map(str::to_string))
            .collect()
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.labels.values().any(|l| l == label)
    }

    /// Cluster ids carrying `label`, ascending
    pub fn clusters_for(&self, label: &str) -> Vec<usize> {
        self.labels
            .iter()
            .filter(|(_, l)| l.as_str() == label)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Distinct labels in cluster id order
    pub fn distinct_labels(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for label in self.labels.values() {
            if !out.contains(&label.as_str()) {
                out.push(label);
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.labels.iter().map(|(&id, l)| (id, l.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
