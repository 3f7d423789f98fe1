//! Run configuration for consensus Pareto selection.
//!
//! A run is described by a TOML, YAML or JSON file. The format is picked from
//! the file extension. Every section has defaults so a config file may be
//! partial and the command line fills in the rest.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FerrobindError, Result};
use crate::objective::{Direction, SweepPolicy};

/// Complete selection run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Candidate table location and layout
    #[serde(default)]
    pub input: InputConfig,

    /// Which columns are objectives
    #[serde(default)]
    pub objectives: ObjectiveConfig,

    /// Sign convention applied per sweep
    #[serde(default)]
    pub policy: SweepPolicy,

    /// Output options
    #[serde(default)]
    pub output: OutputConfig,

    /// Execution options
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Hypervolume diagnostics, if requested
    #[serde(default)]
    pub hypervolume: Option<HypervolumeConfig>,
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the candidate CSV
    pub path: Option<String>,

    /// Column holding the row identifier (binder name or sequence)
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_id_column() -> String { "name".to_string() }
fn default_delimiter() -> char { ',' }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            id_column: default_id_column(),
            delimiter: default_delimiter(),
        }
    }
}

impl InputConfig {
    /// Delimiter as a single byte, as the CSV reader wants it.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(FerrobindError::Config(format!(
                "delimiter '{}' is not a single ASCII character",
                self.delimiter
            )))
        }
    }
}

// ── Objectives ────────────────────────────────────────────────────────────────

/// Objective column selection.
/// An explicit column list wins; otherwise header names are matched by substring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveConfig {
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default = "default_include")]
    pub include: Vec<String>,

    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_include() -> Vec<String> { vec!["pae".to_string()] }
fn default_exclude() -> Vec<String> {
    vec!["uncertainty".to_string(), "acq_Score".to_string()]
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            columns: vec![],
            include: default_include(),
            exclude: default_exclude(),
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Ranked consensus table destination (CSV)
    pub path: Option<String>,

    /// JSON run report destination
    pub report: Option<String>,

    /// Keep at most this many ranked rows; `None` keeps all
    #[serde(default = "default_top_n")]
    pub top_n: Option<usize>,
}

fn default_top_n() -> Option<usize> { Some(100) }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            report: None,
            top_n: default_top_n(),
        }
    }
}

// ── Execution ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Row count from which sweeps run in parallel (when built with `parallel`)
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_parallel_threshold() -> usize { 256 }

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { parallel_threshold: default_parallel_threshold() }
    }
}

// ── Hypervolume ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypervolumeConfig {
    /// Objective columns, in reference-point order
    pub columns: Vec<String>,

    /// Direction per column
    pub directions: Vec<Direction>,

    /// Reference point in raw column units
    pub reference: Vec<f64>,

    /// Column with the optimisation iteration of each row
    #[serde(default = "default_iteration_column")]
    pub iteration_column: String,
}

fn default_iteration_column() -> String { "iteration".to_string() }

impl HypervolumeConfig {
    /// Check that columns, directions and reference point line up.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(FerrobindError::Config("hypervolume needs at least one column".into()));
        }
        if self.directions.len() != self.columns.len() || self.reference.len() != self.columns.len() {
            return Err(FerrobindError::Config(format!(
                "hypervolume has {} columns, {} directions and a {}-dimensional reference point",
                self.columns.len(),
                self.directions.len(),
                self.reference.len()
            )));
        }
        Ok(())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl SelectionConfig {
    /// Load from a file, choosing the format by extension (toml, yaml/yml, json).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let config = match ext.as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            other => {
                return Err(FerrobindError::Config(format!(
                    "unsupported config extension '{}' for {}",
                    other,
                    path.display()
                )))
            }
        };
        tracing::debug!("Loaded selection config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Save as YAML
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
