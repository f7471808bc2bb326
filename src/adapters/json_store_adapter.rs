//! JSON file preset storage adapter.
//!
//! The preset map lives in a single human-readable JSON file, rewritten
//! wholesale on each save. The save writes a sibling temp file and renames it
//! over the old one, so a crash mid-write leaves the previous file intact.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::TraderError;
use crate::domain::preset::Preset;
use crate::ports::store_port::PresetBackend;

pub struct JsonStoreAdapter {
    path: PathBuf,
}

impl JsonStoreAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl PresetBackend for JsonStoreAdapter {
    fn load(&self) -> Result<HashMap<String, Preset>, TraderError> {
        if !self.path.exists() {
            // First run: no presets configured yet.
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| TraderError::PresetLoad {
            file: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn save(&self, presets: &HashMap<String, Preset>) -> Result<(), TraderError> {
        let json =
            serde_json::to_string_pretty(presets).map_err(|e| TraderError::PresetSave {
                reason: e.to_string(),
            })?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| TraderError::PresetSave {
            reason: format!("write {}: {e}", tmp.display()),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| TraderError::PresetSave {
            reason: format!("rename into {}: {e}", self.path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn preset(order_size: f64, min_profit_pct: f64) -> Preset {
        Preset {
            order_size,
            min_profit_pct,
        }
    }

    #[test]
    fn missing_file_loads_as_empty_map() {
        let dir = TempDir::new().unwrap();
        let adapter = JsonStoreAdapter::new(dir.path().join("presets.json"));
        assert!(adapter.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.json");
        let adapter = JsonStoreAdapter::new(&path);

        let mut presets = HashMap::new();
        presets.insert("AAPL".to_string(), preset(500.0, 3.5));
        presets.insert("TSLA".to_string(), preset(250.0, 10.0));
        adapter.save(&presets).unwrap();

        // A fresh adapter on the same path sees the same mapping.
        let reloaded = JsonStoreAdapter::new(&path).load().unwrap();
        assert_eq!(reloaded, presets);
    }

    #[test]
    fn save_rewrites_the_file_wholesale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.json");
        let adapter = JsonStoreAdapter::new(&path);

        let mut presets = HashMap::new();
        presets.insert("AAPL".to_string(), preset(500.0, 3.5));
        adapter.save(&presets).unwrap();

        presets.remove("AAPL");
        presets.insert("TSLA".to_string(), preset(250.0, 10.0));
        adapter.save(&presets).unwrap();

        let reloaded = adapter.load().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains_key("TSLA"));
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.json");
        let adapter = JsonStoreAdapter::new(&path);

        adapter.save(&HashMap::new()).unwrap();
        assert!(path.exists());
        assert!(!adapter.tmp_path().exists());
    }

    #[test]
    fn corrupt_file_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonStoreAdapter::new(&path).load();
        assert!(matches!(result, Err(TraderError::PresetLoad { .. })));
    }

    #[test]
    fn save_into_missing_directory_fails_cleanly() {
        let adapter = JsonStoreAdapter::new("/nonexistent/dir/presets.json");
        let result = adapter.save(&HashMap::new());
        assert!(matches!(result, Err(TraderError::PresetSave { .. })));
    }

    #[test]
    fn file_is_human_readable_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.json");
        let adapter = JsonStoreAdapter::new(&path);

        let mut presets = HashMap::new();
        presets.insert("AAPL".to_string(), preset(500.0, 3.5));
        adapter.save(&presets).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"AAPL\""));
        assert!(raw.contains("\"order_size\""));
        assert!(raw.contains('\n'));
    }
}
