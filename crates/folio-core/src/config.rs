// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name used inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Persistent user preferences. Holds no conversion state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page size used when none is given on the command line.
    pub default_page_size: crate::PageSize,
    /// Output file name used when none is given on the command line.
    pub output_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_page_size: crate::PageSize::A4,
            output_file_name: "converted-images.pdf".into(),
        }
    }
}

impl AppConfig {
    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
