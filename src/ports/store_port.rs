//! Durable preset storage port trait.

use std::collections::HashMap;

use crate::domain::error::TraderError;
use crate::domain::preset::Preset;

/// Backing storage for the preset map.
///
/// The map is small and rewritten wholesale on every save, so the contract is
/// load-everything / replace-everything rather than per-key operations.
pub trait PresetBackend {
    /// Read the full mapping. A backend with no durable data yet yields an
    /// empty map, not an error.
    fn load(&self) -> Result<HashMap<String, Preset>, TraderError>;

    /// Replace the durable mapping. Must be all-or-nothing: a failed save
    /// leaves the previous durable copy intact.
    fn save(&self, presets: &HashMap<String, Preset>) -> Result<(), TraderError>;
}
