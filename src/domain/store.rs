//! Preset store: in-memory map with write-through durability.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::error::TraderError;
use crate::domain::preset::{normalize_symbol, Preset};
use crate::ports::store_port::PresetBackend;

/// The full symbol → preset mapping.
///
/// Loaded once at startup, mutated in memory, and flushed wholesale through
/// the backend after every mutation. Reads are concurrent; `put` holds the
/// write lock across the flush so writers serialize.
pub struct PresetStore {
    backend: Box<dyn PresetBackend + Send + Sync>,
    presets: RwLock<HashMap<String, Preset>>,
}

impl PresetStore {
    /// Load the store from the backend. A backend with no durable data yet
    /// yields an empty store.
    pub fn open(backend: Box<dyn PresetBackend + Send + Sync>) -> Result<Self, TraderError> {
        let presets = backend.load()?;
        Ok(Self {
            backend,
            presets: RwLock::new(presets),
        })
    }

    pub fn get(&self, symbol: &str) -> Option<Preset> {
        self.presets
            .read()
            .unwrap()
            .get(&normalize_symbol(symbol))
            .cloned()
    }

    /// Insert or overwrite the preset for a symbol, then flush the whole map.
    ///
    /// If the flush fails the insert is rolled back, restoring any previous
    /// value, so the in-memory map stays consistent with the durable copy.
    /// The caller is expected to surface the failure and retry.
    pub fn put(&self, symbol: &str, preset: Preset) -> Result<(), TraderError> {
        let key = normalize_symbol(symbol);
        let mut presets = self.presets.write().unwrap();
        let previous = presets.insert(key.clone(), preset);
        if let Err(err) = self.backend.save(&presets) {
            match previous {
                Some(prev) => presets.insert(key, prev),
                None => presets.remove(&key),
            };
            return Err(err);
        }
        Ok(())
    }

    /// Configured symbols, sorted for stable listings.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.presets.read().unwrap().keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn is_empty(&self) -> bool {
        self.presets.read().unwrap().is_empty()
    }
}
