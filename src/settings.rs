use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::NavError;

/// How floating/logo changes reach the document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToggleMode {
    /// Classes follow the aggregate both ways.
    #[default]
    Bidirectional,
    /// Every change force-applies the "on" classes; they are never removed.
    Latching,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavSettings {
    /// Viewports narrower than this (px) report a nav height of 0.
    pub mobile_breakpoint: u32,
    pub resize_throttle_ms: u64,
    pub initially_floating: bool,
    pub initial_logo_visible: bool,
    pub toggle_mode: ToggleMode,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 600,
            resize_throttle_ms: 200,
            initially_floating: true,
            initial_logo_visible: true,
            toggle_mode: ToggleMode::default(),
        }
    }
}

impl NavSettings {
    pub fn resize_interval(&self) -> Duration {
        Duration::from_millis(self.resize_throttle_ms)
    }

    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("[Settings] Failed to parse {:?}: {}, returning defaults", path, e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("[Settings] Failed to read {:?}: {}, returning defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), NavError> {
        let tmp_path = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to tmp, then rename: never leave a half-written file behind.
        fs::write(&tmp_path, json)?;
        fs::rename(tmp_path, path)?;

        Ok(())
    }
}
