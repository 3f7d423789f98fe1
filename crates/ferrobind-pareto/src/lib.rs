//! ferrobind-pareto — Consensus Pareto-front selection for binder-design runs.
//!
//! Candidates are rows of a prediction table; objectives are numeric columns
//! such as predicted interface pAE against several targets. The selector
//! keeps the candidates that stay non-dominated in every per-objective sweep.
//! Hypervolume helpers report how good a front is and how it grew over an
//! optimisation run.

pub mod error;
pub mod matrix;
pub mod table;
pub mod columns;
pub mod dominance;
pub mod selector;
pub mod ranking;
pub mod hypervolume;

pub use error::{ParetoError, Result};
pub use matrix::ObjectiveMatrix;
pub use table::CandidateTable;
pub use columns::ColumnSelector;
pub use selector::{select_consensus_pareto, ConsensusParetoSelector, ConsensusSelection, SweepOutcome};
pub use ranking::rank_members;
pub use hypervolume::{hypervolume, hypervolume_trace, TracePoint};
