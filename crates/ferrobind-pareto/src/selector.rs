//! Consensus Pareto selection.
//!
//! One sweep is run per objective column. Each sweep gets its own direction
//! vector from the [`SweepPolicy`] and yields a non-dominated set. The
//! consensus set is the intersection of all of them, taken over original row
//! indices so rows keep their identity across sweeps.
//!
//! ```text
//! sweep 0:  obj0 ↓  obj1 ↑  obj2 ↑      (PinnedMinimize, k = 3)
//! sweep 1:  obj0 ↓  obj1 ↓  obj2 ↑
//! sweep 2:  obj0 ↓  obj1 ↑  obj2 ↓
//! consensus = front(sweep 0) ∩ front(sweep 1) ∩ front(sweep 2)
//! ```

use std::collections::BTreeSet;

use ferrobind_common::{Direction, SweepPolicy};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dominance::{mask_indices, non_dominated_mask};
use crate::error::Result;
use crate::matrix::ObjectiveMatrix;
use crate::ranking::rank_members;
use crate::table::CandidateTable;

/// Non-dominated set of one sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepOutcome {
    /// Sweep index; for the built-in policies also the pinned objective
    pub pinned: usize,
    pub directions: Vec<Direction>,
    /// Original row indices, ascending
    pub members: Vec<usize>,
}

/// Result of a consensus run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusSelection {
    pub objective_columns: Vec<String>,
    pub sweeps: Vec<SweepOutcome>,
    /// Original row indices present in every sweep, ascending
    pub members: Vec<usize>,
    /// Identifiers of `members`, same order
    pub ids: Vec<String>,
    #[serde(skip)]
    matrix: ObjectiveMatrix,
}

impl ConsensusSelection {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Directions of the first sweep, used as the default ranking order.
    pub fn lead_directions(&self) -> &[Direction] {
        self.sweeps.first().map(|s| s.directions.as_slice()).unwrap_or(&[])
    }

    /// Objective values the sweeps ran on, one row per table row.
    pub fn matrix(&self) -> &ObjectiveMatrix {
        &self.matrix
    }

    /// Consensus rows ordered by [`Self::lead_directions`], at most `top_n` of them.
    pub fn ranked(&self, top_n: Option<usize>) -> Result<Vec<usize>> {
        rank_members(&self.matrix, &self.members, self.lead_directions(), top_n)
    }

    /// The input table restricted to consensus rows, in original order.
    pub fn to_table(&self, table: &CandidateTable) -> CandidateTable {
        table.select_rows(&self.members)
    }
}

/// Configurable selector. `Default` uses [`SweepPolicy::PinnedMinimize`].
#[derive(Debug, Clone)]
pub struct ConsensusParetoSelector {
    policy: SweepPolicy,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel_threshold: usize,
}

impl Default for ConsensusParetoSelector {
    fn default() -> Self {
        Self::new(SweepPolicy::default())
    }
}

impl ConsensusParetoSelector {
    pub fn new(policy: SweepPolicy) -> Self {
        Self { policy, parallel_threshold: 256 }
    }

    /// Row count from which sweeps run on the rayon pool.
    /// Has no effect without the `parallel` feature.
    pub fn with_parallel_threshold(mut self, rows: usize) -> Self {
        self.parallel_threshold = rows;
        self
    }

    pub fn policy(&self) -> &SweepPolicy {
        &self.policy
    }

    /// Run the consensus selection over `objective_columns` of `table`.
    pub fn select(&self, table: &CandidateTable, objective_columns: &[String]) -> Result<ConsensusSelection> {
        let matrix = table.objective_matrix(objective_columns)?;
        let (sweeps, members) = self.select_matrix(&matrix)?;
        let ids = members.iter().map(|&r| table.id(r).to_string()).collect();

        Ok(ConsensusSelection {
            objective_columns: objective_columns.to_vec(),
            sweeps,
            members,
            ids,
            matrix,
        })
    }

    /// Sweep outcomes and consensus indices for an already-built matrix.
    pub fn select_matrix(&self, matrix: &ObjectiveMatrix) -> Result<(Vec<SweepOutcome>, Vec<usize>)> {
        let sweep_dirs = self.policy.sweeps(matrix.n_cols())?;
        debug!(
            "Running {} sweeps over {} rows with policy {}",
            sweep_dirs.len(),
            matrix.n_rows(),
            self.policy.name()
        );

        let sweeps = self.run_sweeps(matrix, sweep_dirs)?;

        let mut consensus: BTreeSet<usize> = match sweeps.first() {
            Some(first) => first.members.iter().copied().collect(),
            None => BTreeSet::new(),
        };
        for sweep in sweeps.iter().skip(1) {
            let members: BTreeSet<usize> = sweep.members.iter().copied().collect();
            consensus = consensus.intersection(&members).copied().collect();
        }
        let consensus: Vec<usize> = consensus.into_iter().collect();

        if consensus.is_empty() && matrix.n_rows() > 0 {
            warn!("No candidate is non-dominated in all {} sweeps", sweeps.len());
        } else {
            info!(
                "Consensus Pareto set: {} of {} candidates across {} sweeps",
                consensus.len(),
                matrix.n_rows(),
                sweeps.len()
            );
        }
        Ok((sweeps, consensus))
    }

    fn run_sweeps(&self, matrix: &ObjectiveMatrix, sweep_dirs: Vec<Vec<Direction>>) -> Result<Vec<SweepOutcome>> {
        #[cfg(feature = "parallel")]
        {
            if matrix.n_rows() >= self.parallel_threshold && sweep_dirs.len() > 1 {
                use rayon::prelude::*;
                return sweep_dirs
                    .into_par_iter()
                    .enumerate()
                    .map(|(pinned, directions)| run_sweep(matrix, pinned, directions))
                    .collect();
            }
        }
        sweep_dirs
            .into_iter()
            .enumerate()
            .map(|(pinned, directions)| run_sweep(matrix, pinned, directions))
            .collect()
    }
}

fn run_sweep(matrix: &ObjectiveMatrix, pinned: usize, directions: Vec<Direction>) -> Result<SweepOutcome> {
    let members = mask_indices(&non_dominated_mask(matrix, &directions)?);
    debug!("Sweep {} kept {} of {} rows", pinned, members.len(), matrix.n_rows());
    Ok(SweepOutcome { pinned, directions, members })
}

/// Consensus Pareto set of `table` over `objective_columns` with the default policy.
pub fn select_consensus_pareto(table: &CandidateTable, objective_columns: &[String]) -> Result<ConsensusSelection> {
    ConsensusParetoSelector::default().select(table, objective_columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParetoError;
    use pretty_assertions::assert_eq;
    use Direction::{Maximize as Max, Minimize as Min};

    fn table(csv: &str) -> CandidateTable {
        CandidateTable::from_csv_str(csv, "name").unwrap()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    const ABCD: &str = "name,obj0,obj1\nA,1,5\nB,2,4\nC,3,3\nD,4,2\n";

    #[test]
    fn test_worked_fixture_default_policy() {
        let sel = select_consensus_pareto(&table(ABCD), &cols(&["obj0", "obj1"])).unwrap();

        assert_eq!(sel.sweeps.len(), 2);
        assert_eq!(sel.sweeps[0].directions, vec![Min, Max]);
        assert_eq!(sel.sweeps[0].members, vec![0]);
        assert_eq!(sel.sweeps[1].directions, vec![Min, Min]);
        assert_eq!(sel.sweeps[1].members, vec![0, 1, 2, 3]);
        assert_eq!(sel.ids(), &["A".to_string()]);
        assert!(!sel.ids().contains(&"D".to_string()));
    }

    #[test]
    fn test_tradeoff_fixture_under_both_minimized() {
        let policy = SweepPolicy::Explicit { sweeps: vec![vec![Min, Min], vec![Min, Min]] };
        let sel = ConsensusParetoSelector::new(policy)
            .select(&table("name,obj0,obj1\nA,1,5\nB,2,4\nC,3,3\n"), &cols(&["obj0", "obj1"]))
            .unwrap();
        assert_eq!(sel.ids(), &["A", "B", "C"].map(String::from));
    }

    #[test]
    fn test_lead_minimize_only_equals_single_front() {
        let t = table(ABCD);
        let sel = ConsensusParetoSelector::new(SweepPolicy::LeadMinimizeOnly)
            .select(&t, &cols(&["obj0", "obj1"]))
            .unwrap();
        assert!(sel.sweeps.iter().all(|s| s.members == sel.members));
    }

    #[test]
    fn test_empty_table_is_empty_selection() {
        let sel = select_consensus_pareto(&table("name,obj0\n"), &cols(&["obj0"])).unwrap();
        assert!(sel.is_empty());
        assert_eq!(sel.sweeps.len(), 1);
    }

    #[test]
    fn test_empty_consensus_is_ok() {
        // Each row wins exactly one sweep, so nothing survives every sweep.
        let policy = SweepPolicy::Explicit { sweeps: vec![vec![Min], vec![Max]] };
        let sel = ConsensusParetoSelector::new(policy)
            .select(&table("name,obj0\nA,1\nB,2\n"), &cols(&["obj0"]))
            .unwrap();
        assert_eq!(sel.sweeps[0].members, vec![0]);
        assert_eq!(sel.sweeps[1].members, vec![1]);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_invalid_inputs() {
        let t = table(ABCD);
        assert!(matches!(select_consensus_pareto(&t, &[]), Err(ParetoError::EmptyObjectives)));
        assert!(matches!(
            select_consensus_pareto(&t, &cols(&["obj9"])),
            Err(ParetoError::UnknownColumn(_))
        ));

        let bad_policy = SweepPolicy::Explicit { sweeps: vec![vec![Min]] };
        let err = ConsensusParetoSelector::new(bad_policy)
            .select(&t, &cols(&["obj0", "obj1"]))
            .unwrap_err();
        assert!(matches!(err, ParetoError::InvalidPolicy(_)));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_non_finite_matrix_is_invalid_input() {
        let err = ObjectiveMatrix::from_rows(
            cols(&["a", "b"]),
            vec![vec![f64::NAN, 1.0], vec![1.0, 2.0], vec![2.0, 0.5]],
        )
        .unwrap_err();
        assert!(matches!(err, ParetoError::NonFinite { .. }));
        assert!(err.is_invalid_input());

        let m = ObjectiveMatrix::from_rows(
            cols(&["a", "b"]),
            vec![vec![0.0, 1.0], vec![1.0, 2.0], vec![2.0, 0.5]],
        )
        .unwrap();
        let (sweeps, members) = ConsensusParetoSelector::default().select_matrix(&m).unwrap();
        assert_eq!(sweeps.len(), 2);
        assert_eq!(members, vec![0]);
    }

    #[test]
    fn test_ranked_uses_stored_matrix() {
        let policy = SweepPolicy::Explicit { sweeps: vec![vec![Max, Min]] };
        let t = table(ABCD);
        let sel = ConsensusParetoSelector::new(policy).select(&t, &cols(&["obj0", "obj1"])).unwrap();
        assert_eq!(sel.members, vec![3]);
        assert_eq!(sel.matrix().n_rows(), 4);
        assert_eq!(sel.ranked(None).unwrap(), vec![3]);

        let all_min = SweepPolicy::Explicit { sweeps: vec![vec![Min, Min]] };
        let sel = ConsensusParetoSelector::new(all_min).select(&t, &cols(&["obj0", "obj1"])).unwrap();
        assert_eq!(sel.ranked(Some(2)).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_parallel_threshold_does_not_change_result() {
        let t = table(ABCD);
        let columns = cols(&["obj0", "obj1"]);
        let sequential = ConsensusParetoSelector::default()
            .with_parallel_threshold(usize::MAX)
            .select(&t, &columns)
            .unwrap();
        let parallel = ConsensusParetoSelector::default()
            .with_parallel_threshold(0)
            .select(&t, &columns)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_to_table() {
        let t = table(ABCD);
        let sel = select_consensus_pareto(&t, &cols(&["obj0", "obj1"])).unwrap();
        let filtered = sel.to_table(&t);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.id(0), "A");
        assert_eq!(sel.lead_directions(), &[Min, Max]);
    }
}
