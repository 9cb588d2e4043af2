use anyhow::{anyhow, Context, Result};
use reqsift_core::{ClusterLabelMap, ClusterModel, ScalerState};
use reqsift_detector::ModelArtifacts;
use reqsift_schema::FeatureVocabulary;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const KMEANS_FILE: &str = "kmeans.json";
pub const LABEL_MAP_FILE: &str = "cluster_label_map.json";

/// Single-file alternative to the four JSON artifacts
pub const BUNDLE_FILE: &str = "model.bin";

/// Reads and writes the fitted model in an artifacts directory.
///
/// Two layouts are understood: four JSON files, one per artifact, or a
/// bincode bundle holding all of them. The bundle wins when both exist.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn has_bundle(&self) -> bool {
        self.dir.join(BUNDLE_FILE).exists()
    }

    /// Load and validate the model
    pub fn load(&self) -> Result<ModelArtifacts> {
        let artifacts = if self.has_bundle() {
            self.load_bundle()?
        } else {
            self.load_json()?
        };

        let gaps = artifacts.unlabelled_clusters();
        if !gaps.is_empty() {
            warn!(
                clusters = ?gaps,
                "label map does not cover every cluster; requests hitting them will fail"
            );
        }
        info!(
            features = artifacts.vocabulary().len(),
            clusters = artifacts.clusters().n_clusters(),
            dir = %self.dir.display(),
            "model artifacts loaded"
        );
        Ok(artifacts)
    }

    pub fn load_json(&self) -> Result<ModelArtifacts> {
        let vocabulary: FeatureVocabulary = self.read_json(FEATURE_COLUMNS_FILE)?;
        let scaler: ScalerState = self.read_json(SCALER_FILE)?;
        let clusters: ClusterModel = self.read_json(KMEANS_FILE)?;
        let labels: ClusterLabelMap = self.read_json(LABEL_MAP_FILE)?;

        ModelArtifacts::new(vocabulary, scaler, clusters, labels)
            .with_context(|| format!("inconsistent artifacts in {}", self.dir.display()))
    }

    pub fn load_bundle(&self) -> Result<ModelArtifacts> {
        let path = self.dir.join(BUNDLE_FILE);
        let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        bincode::deserialize(&data)
            .map_err(|e| anyhow!("Deserialization error in {}: {}", path.display(), e))
    }

    /// Write the four JSON artifacts
    pub fn save_json(&self, artifacts: &ModelArtifacts) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        self.write_json(FEATURE_COLUMNS_FILE, artifacts.vocabulary())?;
        self.write_json(SCALER_FILE, artifacts.scaler())?;
        self.write_json(KMEANS_FILE, artifacts.clusters())?;
        self.write_json(LABEL_MAP_FILE, artifacts.labels())?;
        Ok(())
    }

    /// Write the bincode bundle
    pub fn save_bundle(&self, artifacts: &ModelArtifacts) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let data = bincode::serialize(artifacts)
            .map_err(|e| anyhow!("Serialization error: {}", e))?;
        self.write_atomic(BUNDLE_FILE, &data)
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)?;
        self.write_atomic(name, &data)
    }

    /// Write to a temporary file, then rename over the target
    fn write_atomic(&self, name: &str, data: &[u8]) -> Result<()> {
        let path = self.dir.join(name);
        let temp = path.with_extension("tmp");
        fs::write(&temp, data).with_context(|| format!("writing {}", temp.display()))?;
        fs::rename(&temp, &path).with_context(|| format!("renaming onto {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifacts() -> ModelArtifacts {
        ModelArtifacts::new(
            FeatureVocabulary::new(vec!["bytes".into(), "method_GET".into()]).unwrap(),
            ScalerState::new(vec![100.0, 0.5], vec![10.0, 0.5]).unwrap(),
            ClusterModel::new(vec![vec![0.0, 1.0], vec![3.0, -1.0]]).unwrap(),
            ClusterLabelMap::new([(0, "good"), (1, "bad")]),
        )
        .unwrap()
    }

    #[test]
    fn test_json_layout() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save_json(&artifacts()).unwrap();

        assert!(dir.path().join(FEATURE_COLUMNS_FILE).exists());
        assert!(!store.has_bundle());
        assert_eq!(store.load().unwrap(), artifacts());
    }

    #[test]
    fn test_bundle_layout() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save_bundle(&artifacts()).unwrap();

        assert!(store.has_bundle());
        assert!(!dir.path().join(BUNDLE_FILE).with_extension("tmp").exists());
        assert_eq!(store.load().unwrap(), artifacts());
    }

    #[test]
    fn test_hand_written_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(FEATURE_COLUMNS_FILE), r#"["bytes", "method_GET"]"#).unwrap();
        fs::write(dir.path().join(SCALER_FILE), r#"{"mean_": [0, 0], "scale_": [1, 1]}"#).unwrap();
        fs::write(dir.path().join(KMEANS_FILE), r#"{"cluster_centers_": [[0, 0], [1, 1]]}"#).unwrap();
        fs::write(dir.path().join(LABEL_MAP_FILE), r#"{"0": "bad", "1": "good"}"#).unwrap();

        let loaded = ArtifactStore::new(dir.path()).load().unwrap();
        assert_eq!(loaded.clusters().n_clusters(), 2);
        assert_eq!(loaded.labels().label(0).unwrap(), "bad");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ArtifactStore::new(dir.path()).load().unwrap_err();
        assert!(err.to_string().contains(FEATURE_COLUMNS_FILE));
    }

    #[test]
    fn test_inconsistent_artifacts_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save_json(&artifacts()).unwrap();
        fs::write(dir.path().join(SCALER_FILE), r#"{"mean": [0], "scale": [1]}"#).unwrap();
        assert!(store.load().is_err());
    }
}
