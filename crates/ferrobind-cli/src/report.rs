//! JSON run report written next to the selected table.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use ferrobind_common::Direction;
use ferrobind_pareto::ConsensusSelection;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct SweepSummary {
    pub sweep: usize,
    /// Absent for explicit policies with more sweeps than objectives
    pub pinned_column: Option<String>,
    pub directions: Vec<Direction>,
    pub non_dominated: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub policy: String,
    pub objective_columns: Vec<String>,
    pub candidates: usize,
    pub sweeps: Vec<SweepSummary>,
    pub consensus_size: usize,
    /// Ranked and truncated identifiers, as written to the output table
    pub selected_ids: Vec<String>,
}

impl RunReport {
    pub fn new(
        input: &str,
        policy: &str,
        candidates: usize,
        selection: &ConsensusSelection,
        selected_ids: Vec<String>,
    ) -> Self {
        let sweeps = selection
            .sweeps
            .iter()
            .map(|s| SweepSummary {
                sweep: s.pinned,
                pinned_column: selection.objective_columns.get(s.pinned).cloned(),
                directions: s.directions.clone(),
                non_dominated: s.members.len(),
            })
            .collect();

        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            input: input.to_string(),
            policy: policy.to_string(),
            objective_columns: selection.objective_columns.clone(),
            candidates,
            sweeps,
            consensus_size: selection.len(),
            selected_ids,
        }
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(())
    }
}
