use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// How changesets are printed in text mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Colorize paths and values.
    pub color: bool,
    /// Joins the key segments of a change path.
    pub path_separator: String,
    /// Print a trailing count of leaf changes.
    pub show_summary: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: true,
            path_separator: ".".into(),
            show_summary: true,
        }
    }
}

impl RenderConfig {
    /// Load from a TOML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }
}
