//! Dominated hypervolume of a Pareto front.
//!
//! All values are first folded into maximize form with [`Direction::sign`].
//! The volume is then the measure of the region between the reference point
//! and the union of boxes spanned by each point. The computation slices
//! along the last objective and recurses on the remaining ones, which is
//! exact for any number of objectives.
//!
//! [`hypervolume_trace`] replays an optimisation run iteration by iteration
//! and reports how the front's hypervolume grows as candidates accumulate.

use std::collections::BTreeSet;

use ferrobind_common::Direction;
use serde::Serialize;
use tracing::debug;

use crate::dominance::{mask_indices, non_dominated_mask};
use crate::error::{ParetoError, Result};
use crate::matrix::ObjectiveMatrix;
use crate::table::CandidateTable;

/// Hypervolume dominated by the rows of `matrix` relative to `reference`.
///
/// Rows that do not strictly improve on the reference in every objective add
/// nothing. An empty matrix has volume `0.0`.
pub fn hypervolume(matrix: &ObjectiveMatrix, reference: &[f64], directions: &[Direction]) -> Result<f64> {
    check_shape(matrix.n_cols(), reference, directions)?;

    let signs: Vec<f64> = directions.iter().map(|d| d.sign()).collect();
    let reference: Vec<f64> = reference.iter().zip(&signs).map(|(r, s)| r * s).collect();

    let points: Vec<Vec<f64>> = matrix
        .rows()
        .map(|row| row.iter().zip(&signs).map(|(v, s)| v * s).collect::<Vec<f64>>())
        .filter(|p| p.iter().zip(&reference).all(|(v, r)| v > r))
        .collect();

    Ok(slice_volume(&points, &reference))
}

/// Hypervolume of the non-dominated front of `matrix`.
/// Same value as [`hypervolume`] on the full matrix, with less work.
pub fn front_hypervolume(
    matrix: &ObjectiveMatrix,
    reference: &[f64],
    directions: &[Direction],
) -> Result<(Vec<usize>, f64)> {
    check_shape(matrix.n_cols(), reference, directions)?;
    let front = mask_indices(&non_dominated_mask(matrix, directions)?);
    let volume = hypervolume(&matrix.subset(&front), reference, directions)?;
    Ok((front, volume))
}

fn check_shape(k: usize, reference: &[f64], directions: &[Direction]) -> Result<()> {
    if reference.len() != k {
        return Err(ParetoError::DimensionMismatch { expected: k, actual: reference.len() });
    }
    if directions.len() != k {
        return Err(ParetoError::DimensionMismatch { expected: k, actual: directions.len() });
    }
    if let Some(c) = reference.iter().position(|r| !r.is_finite()) {
        return Err(ParetoError::NonFinite {
            row: "reference".to_string(),
            column: c.to_string(),
        });
    }
    Ok(())
}

/// Points are in maximize form and strictly above `reference` everywhere.
fn slice_volume(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let d = reference.len();
    if d == 1 {
        let best = points.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
        return best - reference[0];
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| b[d - 1].total_cmp(&a[d - 1]));

    let mut volume = 0.0;
    for i in 0..sorted.len() {
        let upper = sorted[i][d - 1];
        let lower = sorted.get(i + 1).map_or(reference[d - 1], |p| p[d - 1]);
        let depth = upper - lower;
        if depth <= 0.0 {
            continue;
        }
        // Everything at or above this level covers the slab
        let projected: Vec<Vec<f64>> = sorted[..=i].iter().map(|p| p[..d - 1].to_vec()).collect();
        volume += depth * slice_volume(&projected, &reference[..d - 1]);
    }
    volume
}

/// Hypervolume after one optimisation iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracePoint {
    pub iteration: i64,
    /// Candidates evaluated up to and including this iteration
    pub evaluated: usize,
    pub front_size: usize,
    pub hypervolume: f64,
}

/// Hypervolume of the accumulated front after each iteration, in ascending
/// iteration order. A table without `iteration_column` is one iteration 0.
pub fn hypervolume_trace(
    table: &CandidateTable,
    columns: &[String],
    directions: &[Direction],
    reference: &[f64],
    iteration_column: &str,
) -> Result<Vec<TracePoint>> {
    let matrix = table.objective_matrix(columns)?;
    check_shape(matrix.n_cols(), reference, directions)?;
    let iterations = table.iterations(iteration_column)?;

    let levels: BTreeSet<i64> = iterations.iter().copied().collect();
    let mut trace = Vec::with_capacity(levels.len());
    for iteration in levels {
        let rows: Vec<usize> = (0..iterations.len()).filter(|&r| iterations[r] <= iteration).collect();
        let (front, volume) = front_hypervolume(&matrix.subset(&rows), reference, directions)?;
        debug!(
            "Iteration {}: {} evaluated, front {}, hypervolume {:.4}",
            iteration,
            rows.len(),
            front.len(),
            volume
        );
        trace.push(TracePoint {
            iteration,
            evaluated: rows.len(),
            front_size: front.len(),
            hypervolume: volume,
        });
    }
    Ok(trace)
}
