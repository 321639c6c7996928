use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Construction-time options of a [`crate::DiffTracker`].
///
/// Loadable from TOML using the camelCase keys forms are configured with:
///
/// ```toml
/// coerceArrayUndefined = true
/// refreshSnapshotOnReset = false
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TrackerOptions {
    /// Treat a missing baseline value as `[]` when the edited value is an array.
    pub coerce_array_undefined: bool,
    /// Fold pending changes into the baseline on reset ("soft reset").
    pub refresh_snapshot_on_reset: bool,
}

impl TrackerOptions {
    pub fn with_coerce_array_undefined(mut self, on: bool) -> Self {
        self.coerce_array_undefined = on;
        self
    }

    pub fn with_refresh_snapshot_on_reset(mut self, on: bool) -> Self {
        self.refresh_snapshot_on_reset = on;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
