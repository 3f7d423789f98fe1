//! `ferrobind hypervolume`: hypervolume trace over optimisation iterations.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use ferrobind_common::{Direction, HypervolumeConfig, SelectionConfig};
use ferrobind_pareto::{hypervolume_trace, TracePoint};
use tracing::info;

#[derive(Debug, Clone, Default, Args)]
pub struct HypervolumeArgs {
    /// Candidate table (CSV)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Identifier column
    #[arg(long)]
    pub id_column: Option<String>,

    /// Objective column, in reference-point order
    #[arg(long = "objective")]
    pub objectives: Vec<String>,

    /// Direction per objective (minimize or maximize)
    #[arg(long = "direction")]
    pub directions: Vec<Direction>,

    /// Reference point, one value per objective
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    pub reference: Vec<f64>,

    /// Column holding the optimisation iteration
    #[arg(long)]
    pub iteration_column: Option<String>,
}

/// Merge flags into the `[hypervolume]` section, creating it if the flags
/// describe a complete one.
pub fn resolve(config: &SelectionConfig, args: &HypervolumeArgs) -> anyhow::Result<HypervolumeConfig> {
    let mut hv = match (&config.hypervolume, args.objectives.is_empty()) {
        (Some(hv), _) => hv.clone(),
        (None, false) => HypervolumeConfig {
            columns: vec![],
            directions: vec![],
            reference: vec![],
            iteration_column: "iteration".to_string(),
        },
        (None, true) => anyhow::bail!(
            "No hypervolume objectives configured (add a [hypervolume] section or pass --objective)"
        ),
    };

    if !args.objectives.is_empty() {
        hv.columns = args.objectives.clone();
    }
    if !args.directions.is_empty() {
        hv.directions = args.directions.clone();
    }
    if !args.reference.is_empty() {
        hv.reference = args.reference.clone();
    }
    if let Some(ref column) = args.iteration_column {
        hv.iteration_column = column.clone();
    }

    hv.validate()?;
    Ok(hv)
}

pub async fn run(config: &SelectionConfig, hv: &HypervolumeConfig) -> anyhow::Result<Vec<TracePoint>> {
    let input = config
        .input
        .path
        .as_deref()
        .context("No input table given (set input.path or pass --input)")?;
    let delimiter = config.input.delimiter_byte()?;
    let table = super::load_table(Path::new(input), &config.input.id_column, delimiter).await?;

    let trace = hypervolume_trace(&table, &hv.columns, &hv.directions, &hv.reference, &hv.iteration_column)?;
    if let Some(last) = trace.last() {
        info!(
            "Final hypervolume {:.4} after {} candidates ({} on the front)",
            last.hypervolume, last.evaluated, last.front_size
        );
    }
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_from_flags_only() {
        let args = HypervolumeArgs {
            objectives: vec!["pae_a".into(), "pae_b".into()],
            directions: vec![Direction::Minimize, Direction::Maximize],
            reference: vec![28.0, 3.0],
            ..Default::default()
        };
        let hv = resolve(&SelectionConfig::default(), &args).unwrap();
        assert_eq!(hv.columns, vec!["pae_a", "pae_b"]);
        assert_eq!(hv.iteration_column, "iteration");
    }

    #[test]
    fn test_resolve_requires_matching_shapes() {
        let args = HypervolumeArgs {
            objectives: vec!["pae_a".into(), "pae_b".into()],
            directions: vec![Direction::Minimize],
            reference: vec![28.0, 3.0],
            ..Default::default()
        };
        assert!(resolve(&SelectionConfig::default(), &args).is_err());
    }

    #[test]
    fn test_resolve_without_objectives_fails() {
        assert!(resolve(&SelectionConfig::default(), &HypervolumeArgs::default()).is_err());
    }

    #[test]
    fn test_flags_override_config_section() {
        let mut config = SelectionConfig::default();
        config.hypervolume = Some(HypervolumeConfig {
            columns: vec!["a".into(), "b".into()],
            directions: vec![Direction::Maximize, Direction::Maximize],
            reference: vec![0.0, 0.0],
            iteration_column: "round".into(),
        });
        let args = HypervolumeArgs { reference: vec![1.0, 1.0], ..Default::default() };
        let hv = resolve(&config, &args).unwrap();
        assert_eq!(hv.reference, vec![1.0, 1.0]);
        assert_eq!(hv.iteration_column, "round");
    }

    #[tokio::test]
    async fn test_run_trace() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bo.csv");
        std::fs::write(&input, "name,a,b,iteration\nx,1,1,0\ny,2,2,1\n").unwrap();

        let mut config = SelectionConfig::default();
        config.input.path = Some(input.display().to_string());
        let hv = HypervolumeConfig {
            columns: vec!["a".into(), "b".into()],
            directions: vec![Direction::Maximize, Direction::Maximize],
            reference: vec![0.0, 0.0],
            iteration_column: "iteration".into(),
        };

        let trace = run(&config, &hv).await.unwrap();
        assert_eq!(trace.len(), 2);
        assert!((trace[0].hypervolume - 1.0).abs() < 1e-9);
        assert!((trace[1].hypervolume - 4.0).abs() < 1e-9);
    }
}
