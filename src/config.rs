use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How generated node and edge ids get their suffix
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Short base-36 counter, deterministic per session
    #[default]
    Sequential,
    /// Timestamp-sortable ULID
    Ulid,
}

/// Settings for one flow-design session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DesignerConfig {
    pub id_strategy: IdStrategy,

    /// Cap on retained event history; `None` keeps everything
    pub history_limit: Option<usize>,

    /// Separator used in synthesized edge labels
    pub flow_arrow: String,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Sequential,
            history_limit: None,
            flow_arrow: " → ".to_string(),
        }
    }
}

impl DesignerConfig {
    /// Load config from a JSON file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config from: {}", path.display()))
    }

    /// Join two labels with the configured arrow
    pub fn flow_label(&self, from: &str, to: &str) -> String {
        format!("{}{}{}", from, self.flow_arrow, to)
    }
}
