//! Pareto dominance and non-dominated masks.

use std::cmp::Ordering;

use ferrobind_common::Direction;

use crate::error::{ParetoError, Result};
use crate::matrix::ObjectiveMatrix;

/// True if `a` dominates `b`: no worse in every objective, strictly better in one.
/// Identical vectors never dominate each other.
pub fn dominates(a: &[f64], b: &[f64], directions: &[Direction]) -> bool {
    let mut strictly_better = false;
    for ((&x, &y), &dir) in a.iter().zip(b).zip(directions) {
        if dir.better(y, x) {
            return false;
        }
        if dir.better(x, y) {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Mask of rows not dominated by any other row under `directions`.
///
/// Two objectives use a sort-and-sweep in O(n log n); anything else
/// falls back to pairwise comparison. Both give identical masks.
pub fn non_dominated_mask(matrix: &ObjectiveMatrix, directions: &[Direction]) -> Result<Vec<bool>> {
    if directions.len() == 2 {
        non_dominated_mask_2d(matrix, directions)
    } else {
        non_dominated_mask_pairwise(matrix, directions)
    }
}

pub fn non_dominated_mask_pairwise(matrix: &ObjectiveMatrix, directions: &[Direction]) -> Result<Vec<bool>> {
    check_directions(matrix, directions)?;
    let n = matrix.n_rows();
    let mut keep = vec![true; n];
    for i in 0..n {
        let row = matrix.row(i);
        keep[i] = !(0..n).any(|j| j != i && dominates(matrix.row(j), row, directions));
    }
    Ok(keep)
}

/// Two-objective mask. Values are folded into minimize form, sorted by the
/// first objective, and each group of equal first values is checked against
/// the best second value seen in earlier groups.
pub fn non_dominated_mask_2d(matrix: &ObjectiveMatrix, directions: &[Direction]) -> Result<Vec<bool>> {
    check_directions(matrix, directions)?;
    if directions.len() != 2 {
        return Err(ParetoError::DimensionMismatch { expected: 2, actual: directions.len() });
    }

    let n = matrix.n_rows();
    let (sx, sy) = (-directions[0].sign(), -directions[1].sign());
    let points: Vec<(f64, f64)> = matrix.rows().map(|r| (r[0] * sx, r[1] * sy)).collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (points[a], points[b]);
        pa.0.partial_cmp(&pb.0)
            .unwrap_or(Ordering::Equal)
            .then(pa.1.partial_cmp(&pb.1).unwrap_or(Ordering::Equal))
    });

    let mut keep = vec![false; n];
    let mut best_prev = f64::INFINITY;
    let mut start = 0;
    while start < n {
        let x = points[order[start]].0;
        let mut end = start + 1;
        while end < n && points[order[end]].0 == x {
            end += 1;
        }
        // Sorted by y within the group, so the first entry holds the group minimum
        let group_min = points[order[start]].1;
        if group_min < best_prev {
            for &r in &order[start..end] {
                keep[r] = points[r].1 == group_min;
            }
        }
        best_prev = best_prev.min(group_min);
        start = end;
    }
    Ok(keep)
}

fn check_directions(matrix: &ObjectiveMatrix, directions: &[Direction]) -> Result<()> {
    if directions.len() != matrix.n_cols() {
        return Err(ParetoError::DimensionMismatch {
            expected: matrix.n_cols(),
            actual: directions.len(),
        });
    }
    Ok(())
}

/// Indices of the rows kept by `mask`, ascending.
pub fn mask_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &kept)| kept.then_some(i))
        .collect()
}
