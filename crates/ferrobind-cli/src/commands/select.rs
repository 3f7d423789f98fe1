//! `ferrobind select`: consensus Pareto selection over a candidate table.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use ferrobind_common::{SelectionConfig, SweepPolicy};
use ferrobind_pareto::{ColumnSelector, ConsensusParetoSelector};
use tracing::{info, warn};

use crate::report::RunReport;

#[derive(Debug, Clone, Default, Args)]
pub struct SelectArgs {
    /// Candidate table (CSV)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Identifier column
    #[arg(long)]
    pub id_column: Option<String>,

    /// Objective column, in order; repeat for each objective
    #[arg(long = "objective")]
    pub objectives: Vec<String>,

    /// Sweep policy: pinned_minimize or lead_minimize_only
    #[arg(long)]
    pub policy: Option<String>,

    /// Write the ranked consensus table here
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write a JSON run report here
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Keep at most this many ranked rows
    #[arg(long, conflicts_with = "no_limit")]
    pub top_n: Option<usize>,

    /// Keep every consensus row
    #[arg(long)]
    pub no_limit: bool,
}

/// Fold command-line flags over the loaded configuration.
pub fn apply_overrides(config: &mut SelectionConfig, args: &SelectArgs) -> anyhow::Result<()> {
    if let Some(ref input) = args.input {
        config.input.path = Some(input.display().to_string());
    }
    if let Some(ref id) = args.id_column {
        config.input.id_column = id.clone();
    }
    if !args.objectives.is_empty() {
        config.objectives.columns = args.objectives.clone();
    }
    if let Some(ref mode) = args.policy {
        config.policy = SweepPolicy::from_mode(mode)?;
    }
    if let Some(ref output) = args.output {
        config.output.path = Some(output.display().to_string());
    }
    if let Some(ref report) = args.report {
        config.output.report = Some(report.display().to_string());
    }
    if args.no_limit {
        config.output.top_n = None;
    } else if args.top_n.is_some() {
        config.output.top_n = args.top_n;
    }
    Ok(())
}

/// What a selection run produced.
#[derive(Debug, Clone)]
pub struct SelectOutcome {
    pub candidates: usize,
    pub consensus_size: usize,
    /// Ranked, truncated identifiers
    pub selected_ids: Vec<String>,
}

pub async fn run(config: &SelectionConfig) -> anyhow::Result<SelectOutcome> {
    let input = config
        .input
        .path
        .as_deref()
        .context("No input table given (set input.path or pass --input)")?;
    let delimiter = config.input.delimiter_byte()?;

    let table = super::load_table(Path::new(input), &config.input.id_column, delimiter).await?;
    let columns = ColumnSelector::from(&config.objectives).resolve(&table)?;
    info!("Objective columns: {}", columns.join(", "));

    let selection = ConsensusParetoSelector::new(config.policy.clone())
        .with_parallel_threshold(config.execution.parallel_threshold)
        .select(&table, &columns)?;
    if selection.is_empty() {
        warn!("Consensus Pareto set is empty; outputs will contain no candidates");
    }

    let ranked = selection.ranked(config.output.top_n)?;
    let selected = table.select_rows(&ranked);
    let selected_ids: Vec<String> = selected.ids().map(str::to_string).collect();

    if let Some(ref output) = config.output.path {
        selected
            .to_path(output, delimiter)
            .with_context(|| format!("Failed to write {}", output))?;
        info!("Saved {} Pareto-optimal candidates to {}", selected.len(), output);
    }

    if let Some(ref report_path) = config.output.report {
        let report = RunReport::new(input, config.policy.name(), table.len(), &selection, selected_ids.clone());
        report.write(Path::new(report_path))?;
        info!("Run report {} written to {}", report.run_id, report_path);
    }

    Ok(SelectOutcome {
        candidates: table.len(),
        consensus_size: selection.len(),
        selected_ids,
    })
}
