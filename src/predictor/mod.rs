//! Temperature predictor seam and the process-wide model cache.
//!
//! [`TemperaturePredictor`] is what the scorer talks to. [`ForestModel`] is
//! the artifact-backed implementation, and [`ModelCache`] makes sure the
//! artifact is read from disk at most once per process.

mod forest;

pub use forest::{ARTIFACT_SCHEMA_VERSION, ForestModel, ModelError, Node, Tree};

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::error;

use crate::scoring::features::{FeatureRecord, SegmentStride};

/// Black-box regressor from a [`FeatureRecord`] to degrees Celsius.
pub trait TemperaturePredictor: Send + Sync {
    /// Stride the model's `segment_id` column was built with.
    fn segment_stride(&self) -> SegmentStride;

    fn predict(&self, record: &FeatureRecord) -> anyhow::Result<f64>;

    /// Predicts a whole route at once. Output order matches `records`.
    fn predict_batch(&self, records: &[FeatureRecord]) -> anyhow::Result<Vec<f64>> {
        records.iter().map(|r| self.predict(r)).collect()
    }
}

/// Loads the model artifact lazily, once, and hands out shared references.
///
/// A failed load is remembered too: later queries see the same error instead
/// of retrying the read.
pub struct ModelCache {
    path: PathBuf,
    cell: OnceLock<Result<Arc<ForestModel>, String>>,
}

impl ModelCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<Arc<ForestModel>, String> {
        self.cell
            .get_or_init(|| {
                ForestModel::load(&self.path).map(Arc::new).map_err(|e| {
                    error!(path = %self.path.display(), error = %e, "Failed to load temperature model");
                    e.to_string()
                })
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    const MODEL: &str = r#"{
        "schema_version": 1,
        "segment_stride": 4,
        "features": ["route_id", "segment_id", "start_hour", "month"],
        "trees": [{ "nodes": [{"value": 27.5}] }]
    }"#;

    #[test]
    fn test_cache_loads_once() {
        let path = temp_path("temp_traverse_test_cache_once.json");
        fs::write(&path, MODEL).unwrap();

        let cache = ModelCache::new(&path);
        let first = cache.get().unwrap();
        // a second read from disk would now fail
        fs::remove_file(&path).unwrap();
        let second = cache.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_remembers_failure() {
        let path = temp_path("temp_traverse_test_cache_missing.json");
        let _ = fs::remove_file(&path);

        let cache = ModelCache::new(&path);
        assert!(cache.get().is_err());
        // appearing later does not matter, the first outcome sticks
        fs::write(&path, MODEL).unwrap();
        assert!(cache.get().is_err());

        fs::remove_file(&path).unwrap();
    }
}
