//! Tool configuration.
//!
//! Every operation has a plain form that uses [`ToolConfig::default`] and a
//! `_with_config` form for files whose column names or markers differ from
//! the ermineJ defaults.

use crate::error::{ErmineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Column names, line markers and thresholds used across the crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Base data directory handed to the ermineJ invocation entry points.
    pub data_dir: PathBuf,
    /// Prefix marking header lines in raw ermineJ output.
    pub header_marker: String,
    /// Prefix marking data lines in raw ermineJ output.
    pub data_marker: String,
    /// Appended to a raw result path to derive the persistent TSV path.
    pub tsv_suffix: String,
    /// Appended to a raw result path to derive the temporary stripped path.
    pub stripped_suffix: String,
    /// Gene-set identifier column.
    pub id_column: String,
    /// Gene-set name column.
    pub name_column: String,
    /// Multiple-testing corrected p-value column.
    pub corrected_pvalue_column: String,
    /// Raw p-value column.
    pub pvalue_column: String,
    /// Only terms strictly below this corrected p-value are reported.
    pub significance: f64,
    /// Default number of terms to report.
    pub top_n: usize,
    /// Column holding the statistic computed on real data.
    pub real_column: String,
    /// Substring identifying shuffled-control columns.
    pub shuffle_marker: String,
    /// Column used to rank probes, highest first.
    pub rank_column: String,
    /// Probe identifier column.
    pub probe_column: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/data"),
            header_marker: "#!".to_string(),
            data_marker: "!".to_string(),
            tsv_suffix: "-tsv".to_string(),
            stripped_suffix: ".stripped.tsv".to_string(),
            id_column: "ID".to_string(),
            name_column: "Name".to_string(),
            corrected_pvalue_column: "CorrectedPvalue".to_string(),
            pvalue_column: "Pval".to_string(),
            significance: 0.05,
            top_n: 10,
            real_column: "p".to_string(),
            shuffle_marker: "p_".to_string(),
            rank_column: "seq".to_string(),
            probe_column: "probe_id".to_string(),
        }
    }
}

impl ToolConfig {
    /// Load from YAML string. Missing keys fall back to their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(ErmineError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ErmineError::from)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Use a different base data directory.
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}
