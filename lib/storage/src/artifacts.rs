//! Persisted artifact set for one index generation.
//!
//! Four files live under the data directory: the bincode-serialized flat
//! index, the recipe metadata (JSON array of records), the searchable texts
//! (JSON array, index-aligned with the metadata), and a small config
//! descriptor used to decide whether a cached build is reusable.
//!
//! Saves go through temp files renamed into place, so a failed save leaves
//! the prior generation untouched.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::Utc;
use forkful_core::{Error, FlatIndex, RecipeRecord, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const INDEX_FILE: &str = "recipe_index.bin";
pub const METADATA_FILE: &str = "recipe_metadata.json";
pub const TEXTS_FILE: &str = "recipe_texts.json";
pub const CONFIG_FILE: &str = "index_config.json";

/// Config descriptor persisted alongside the index.
///
/// `model_name`, `num_recipes` and `embedding_dim` are the required keys; a
/// config that fails to parse with all three present makes the cache invalid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexConfig {
    pub model_name: String,
    pub num_recipes: u32,
    pub embedding_dim: u32,
    #[serde(default)]
    pub index_type: String,
    #[serde(default)]
    pub created_at: String,
}

/// Everything a valid cache restores.
#[derive(Debug)]
pub struct LoadedArtifacts {
    pub records: Vec<RecipeRecord>,
    pub texts: Vec<String>,
    pub index: FlatIndex,
    pub config: IndexConfig,
}

/// Handle on the artifact set under one data directory.
#[derive(Debug, Clone)]
pub struct RecipeArtifacts {
    data_dir: PathBuf,
}

impl RecipeArtifacts {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// True when all four artifact files exist and the config descriptor
    /// parses with its required keys.
    ///
    /// Deliberately does not verify content-level agreement (counts,
    /// checksums) between the files; [`RecipeArtifacts::load`] cross-checks
    /// those and reports `CacheCorrupt` on mismatch.
    #[must_use]
    pub fn is_cache_valid(&self) -> bool {
        let all_present = [INDEX_FILE, METADATA_FILE, TEXTS_FILE, CONFIG_FILE]
            .iter()
            .all(|file| self.path(file).exists());
        if !all_present {
            return false;
        }

        match File::open(self.path(CONFIG_FILE)) {
            Ok(file) => serde_json::from_reader::<_, IndexConfig>(BufReader::new(file)).is_ok(),
            Err(_) => false,
        }
    }

    /// Load all four artifacts.
    ///
    /// Any deserialization failure, and any count or dimension disagreement
    /// between the config descriptor and the loaded data, is `CacheCorrupt`;
    /// the caller falls back to a full rebuild.
    pub fn load(&self) -> Result<LoadedArtifacts> {
        let config: IndexConfig = read_json(&self.path(CONFIG_FILE))?;
        let records: Vec<RecipeRecord> = read_json(&self.path(METADATA_FILE))?;
        let texts: Vec<String> = read_json(&self.path(TEXTS_FILE))?;

        let index_bytes = std::fs::read(self.path(INDEX_FILE))
            .map_err(|e| Error::CacheCorrupt(format!("{INDEX_FILE}: {e}")))?;
        let index: FlatIndex = bincode::deserialize(&index_bytes)
            .map_err(|e| Error::CacheCorrupt(format!("{INDEX_FILE}: {e}")))?;

        let n = config.num_recipes as usize;
        if records.len() != n || texts.len() != n || index.len() != n {
            return Err(Error::CacheCorrupt(format!(
                "config declares {n} recipes but found {} metadata / {} texts / {} vectors",
                records.len(),
                texts.len(),
                index.len()
            )));
        }
        if index.dim() != config.embedding_dim as usize {
            return Err(Error::CacheCorrupt(format!(
                "config declares dim {} but index has dim {}",
                config.embedding_dim,
                index.dim()
            )));
        }

        debug!(recipes = n, dim = index.dim(), "loaded cached index artifacts");
        Ok(LoadedArtifacts {
            records,
            texts,
            index,
            config,
        })
    }

    /// Write a full artifact generation.
    ///
    /// Everything is serialized up front, so serialization failures happen
    /// before any file is touched; each file then goes through a temp path
    /// renamed into place.
    pub fn save(
        &self,
        records: &[RecipeRecord],
        texts: &[String],
        index: &FlatIndex,
        model_name: &str,
    ) -> Result<IndexConfig> {
        let config = IndexConfig {
            model_name: model_name.to_string(),
            num_recipes: records.len() as u32,
            embedding_dim: index.dim() as u32,
            index_type: "FlatIndex".to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let index_bytes =
            bincode::serialize(index).map_err(|e| Error::Serialization(e.to_string()))?;
        let metadata_bytes =
            serde_json::to_vec_pretty(records).map_err(|e| Error::Serialization(e.to_string()))?;
        let texts_bytes =
            serde_json::to_vec_pretty(texts).map_err(|e| Error::Serialization(e.to_string()))?;
        let config_bytes =
            serde_json::to_vec_pretty(&config).map_err(|e| Error::Serialization(e.to_string()))?;

        write_atomic(&self.path(INDEX_FILE), &index_bytes)?;
        write_atomic(&self.path(METADATA_FILE), &metadata_bytes)?;
        write_atomic(&self.path(TEXTS_FILE), &texts_bytes)?;
        // Config last: the cache only validates once the descriptor lands.
        write_atomic(&self.path(CONFIG_FILE), &config_bytes)?;

        info!(
            recipes = config.num_recipes,
            dim = config.embedding_dim,
            dir = %self.data_dir.display(),
            "saved index artifacts"
        );
        Ok(config)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .map_err(|e| Error::CacheCorrupt(format!("{}: {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::CacheCorrupt(format!("{}: {e}", path.display())))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(bytes))
        .map_err(|e| match e {
            atomicwrites::Error::Internal(err) | atomicwrites::Error::User(err) => Error::Io(err),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forkful_core::Vector;

    fn sample_records(n: usize) -> Vec<RecipeRecord> {
        (1..=n as u64)
            .map(|id| RecipeRecord {
                id,
                name: format!("Recipe {id}"),
                ingredients: vec!["salt".to_string()],
                instructions: vec!["mix".to_string()],
                ingredient_tags: vec!["salt".to_string()],
                category: "Main Course".to_string(),
                prep_time: "5 min".to_string(),
                cook_time: "15 min".to_string(),
                difficulty: "Easy".to_string(),
            })
            .collect()
    }

    fn sample_index(n: usize) -> FlatIndex {
        let mut index = FlatIndex::new();
        index
            .build(
                (0..n)
                    .map(|i| Vector::new(vec![i as f32 + 1.0, 1.0, 0.5]))
                    .collect(),
            )
            .unwrap();
        index
    }

    #[test]
    fn test_cache_invalid_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = RecipeArtifacts::new(dir.path()).unwrap();
        assert!(!artifacts.is_cache_valid());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = RecipeArtifacts::new(dir.path()).unwrap();

        let records = sample_records(3);
        let texts: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        let index = sample_index(3);

        let config = artifacts.save(&records, &texts, &index, "hashing-trigram-v1").unwrap();
        assert_eq!(config.num_recipes, 3);
        assert_eq!(config.embedding_dim, 3);
        assert!(artifacts.is_cache_valid());

        let loaded = artifacts.load().unwrap();
        assert_eq!(loaded.records, records);
        assert_eq!(loaded.texts, texts);
        assert_eq!(loaded.index.len(), 3);
        assert_eq!(loaded.config.model_name, "hashing-trigram-v1");
        assert!(!loaded.config.created_at.is_empty());
    }

    #[test]
    fn test_validity_checks_required_keys_only() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = RecipeArtifacts::new(dir.path()).unwrap();

        let records = sample_records(2);
        let texts: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        artifacts.save(&records, &texts, &sample_index(2), "m").unwrap();

        // A config missing a required key invalidates the cache...
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"model_name": "m", "num_recipes": 2}"#,
        )
        .unwrap();
        assert!(!artifacts.is_cache_valid());

        // ...but a config whose counts merely disagree with the data still
        // passes the shallow validity check (documented limitation).
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"model_name": "m", "num_recipes": 50, "embedding_dim": 3}"#,
        )
        .unwrap();
        assert!(artifacts.is_cache_valid());

        // load() is where the disagreement surfaces.
        let err = artifacts.load().unwrap_err();
        assert!(matches!(err, Error::CacheCorrupt(_)));
    }

    #[test]
    fn test_missing_artifact_invalidates_cache() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = RecipeArtifacts::new(dir.path()).unwrap();

        let records = sample_records(2);
        let texts: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        artifacts.save(&records, &texts, &sample_index(2), "m").unwrap();

        std::fs::remove_file(dir.path().join(TEXTS_FILE)).unwrap();
        assert!(!artifacts.is_cache_valid());
    }

    #[test]
    fn test_corrupt_index_reports_cache_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = RecipeArtifacts::new(dir.path()).unwrap();

        let records = sample_records(2);
        let texts: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        artifacts.save(&records, &texts, &sample_index(2), "m").unwrap();

        std::fs::write(dir.path().join(INDEX_FILE), b"garbage").unwrap();
        let err = artifacts.load().unwrap_err();
        assert!(matches!(err, Error::CacheCorrupt(_)));
    }

    #[test]
    fn test_resave_replaces_generation() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = RecipeArtifacts::new(dir.path()).unwrap();

        let records = sample_records(2);
        let texts: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        artifacts.save(&records, &texts, &sample_index(2), "m").unwrap();

        let records = sample_records(5);
        let texts: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        artifacts.save(&records, &texts, &sample_index(5), "m").unwrap();

        let loaded = artifacts.load().unwrap();
        assert_eq!(loaded.records.len(), 5);
        assert_eq!(loaded.config.num_recipes, 5);
    }
}
