//! Dense objective matrix, one row per candidate.

use crate::error::{ParetoError, Result};

/// Row-major `rows × k` matrix of objective values.
/// Row `r` is candidate `r` of the table it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveMatrix {
    columns: Vec<String>,
    values: Vec<f64>,
    n_rows: usize,
}

impl ObjectiveMatrix {
    /// Build from per-row vectors. Every row must have one finite value per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ParetoError::EmptyObjectives);
        }
        let k = columns.len();
        let n_rows = rows.len();
        let mut values = Vec::with_capacity(n_rows * k);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != k {
                return Err(ParetoError::DimensionMismatch { expected: k, actual: row.len() });
            }
            if let Some(c) = row.iter().position(|v| !v.is_finite()) {
                return Err(ParetoError::NonFinite {
                    row: r.to_string(),
                    column: columns[c].clone(),
                });
            }
            values.extend(row);
        }
        Ok(Self { columns, values, n_rows })
    }

    pub(crate) fn from_parts(columns: Vec<String>, values: Vec<f64>, n_rows: usize) -> Self {
        debug_assert_eq!(values.len(), n_rows * columns.len());
        Self { columns, values, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row(&self, r: usize) -> &[f64] {
        let k = self.n_cols();
        &self.values[r * k..(r + 1) * k]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.n_cols())
    }

    /// Matrix restricted to `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Self {
        let mut values = Vec::with_capacity(indices.len() * self.n_cols());
        for &r in indices {
            values.extend_from_slice(self.row(r));
        }
        Self::from_parts(self.columns.clone(), values, indices.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_and_subset() {
        let m = ObjectiveMatrix::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
        )
        .unwrap();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.rows().count(), 3);

        let sub = m.subset(&[2, 0]);
        assert_eq!(sub.n_rows(), 2);
        assert_eq!(sub.row(0), &[5.0, 6.0]);
        assert_eq!(sub.row(1), &[1.0, 2.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = ObjectiveMatrix::from_rows(vec!["a".into()], vec![vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, ParetoError::DimensionMismatch { expected: 1, actual: 2 }));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = ObjectiveMatrix::from_rows(
                vec!["a".into(), "b".into()],
                vec![vec![1.0, 2.0], vec![bad, 1.0], vec![2.0, 0.5]],
            )
            .unwrap_err();
            assert!(
                matches!(err, ParetoError::NonFinite { ref row, ref column } if row == "1" && column == "a"),
                "{err}"
            );
            assert!(err.is_invalid_input());
        }
    }
}
