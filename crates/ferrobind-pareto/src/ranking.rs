//! Ordering of Pareto members for output.
//! Columns are compared lexicographically in objective order, each by its own direction.

use std::cmp::Ordering;

use ferrobind_common::Direction;

use crate::error::{ParetoError, Result};
use crate::matrix::ObjectiveMatrix;

/// Compare two objective vectors, better rows first.
pub fn compare_rows(a: &[f64], b: &[f64], directions: &[Direction]) -> Ordering {
    for ((&x, &y), &dir) in a.iter().zip(b).zip(directions) {
        let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        let ord = match dir {
            Direction::Minimize => ord,
            Direction::Maximize => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Sort `members` (row indices into `matrix`) best first and keep at most `top_n`.
/// Equal rows keep their incoming order.
pub fn rank_members(
    matrix: &ObjectiveMatrix,
    members: &[usize],
    directions: &[Direction],
    top_n: Option<usize>,
) -> Result<Vec<usize>> {
    if directions.len() != matrix.n_cols() {
        return Err(ParetoError::DimensionMismatch {
            expected: matrix.n_cols(),
            actual: directions.len(),
        });
    }
    if let Some(&row) = members.iter().find(|&&r| r >= matrix.n_rows()) {
        return Err(ParetoError::RowOutOfRange { row, rows: matrix.n_rows() });
    }

    let mut ranked = members.to_vec();
    ranked.sort_by(|&a, &b| compare_rows(matrix.row(a), matrix.row(b), directions));
    if let Some(n) = top_n {
        ranked.truncate(n);
    }
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Maximize as Max, Minimize as Min};

    fn matrix() -> ObjectiveMatrix {
        ObjectiveMatrix::from_rows(
            vec!["pae_t1".into(), "pae_t2".into()],
            vec![
                vec![8.0, 20.0],
                vec![6.0, 18.0],
                vec![6.0, 25.0],
                vec![10.0, 30.0],
                vec![6.0, 25.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_first_ascending_rest_descending() {
        let ranked = rank_members(&matrix(), &[0, 1, 2, 3, 4], &[Min, Max], None).unwrap();
        assert_eq!(ranked, vec![2, 4, 1, 0, 3]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let ranked = rank_members(&matrix(), &[0, 1, 2, 3, 4], &[Min, Max], Some(2)).unwrap();
        assert_eq!(ranked, vec![2, 4]);
    }

    #[test]
    fn test_subset_only() {
        let ranked = rank_members(&matrix(), &[3, 0], &[Min, Min], Some(10)).unwrap();
        assert_eq!(ranked, vec![0, 3]);
    }

    #[test]
    fn test_rejects_bad_shape() {
        assert!(matches!(
            rank_members(&matrix(), &[0, 1], &[Min], None),
            Err(ParetoError::DimensionMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            rank_members(&matrix(), &[0, 5], &[Min, Max], None),
            Err(ParetoError::RowOutOfRange { row: 5, rows: 5 })
        ));
    }
}
