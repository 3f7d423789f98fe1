//! Objective column selection.
//!
//! Prediction tables carry several score families side by side (predicted
//! pAE, its uncertainty, acquisition scores). The selector picks the
//! objective columns either from an explicit list or by substring patterns
//! over the header.

use ferrobind_common::ObjectiveConfig;

use crate::error::{ParetoError, Result};
use crate::table::CandidateTable;

#[derive(Debug, Clone, Default)]
pub struct ColumnSelector {
    pub explicit: Vec<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl From<&ObjectiveConfig> for ColumnSelector {
    fn from(cfg: &ObjectiveConfig) -> Self {
        Self {
            explicit: cfg.columns.clone(),
            include: cfg.include.clone(),
            exclude: cfg.exclude.clone(),
        }
    }
}

impl ColumnSelector {
    pub fn explicit(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            explicit: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn patterns(
        include: impl IntoIterator<Item = impl Into<String>>,
        exclude: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            explicit: vec![],
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve against a table header.
    pub fn resolve(&self, table: &CandidateTable) -> Result<Vec<String>> {
        if !self.explicit.is_empty() {
            for name in &self.explicit {
                if table.column_index(name).is_none() {
                    return Err(ParetoError::UnknownColumn(name.clone()));
                }
            }
            return Ok(self.explicit.clone());
        }

        let chosen: Vec<String> = table
            .headers()
            .iter()
            .filter(|h| h.as_str() != table.id_column())
            .filter(|h| self.include.iter().any(|p| h.contains(p.as_str())))
            .filter(|h| !self.exclude.iter().any(|p| h.contains(p.as_str())))
            .cloned()
            .collect();

        if chosen.is_empty() {
            return Err(ParetoError::EmptySelection);
        }
        tracing::debug!("Objective columns by pattern: {:?}", chosen);
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CandidateTable {
        CandidateTable::from_csv_str(
            "name,predicted_pae_interaction_t1,predicted_pae_interaction_t2,\
             uncertainty_pae_t1,acq_Score_pae,plddt\n\
             A,1,2,0.1,0.5,80\n",
            "name",
        )
        .unwrap()
    }

    #[test]
    fn test_patterns_keep_header_order() {
        let sel = ColumnSelector::patterns(["pae"], ["uncertainty", "acq_Score"]);
        assert_eq!(
            sel.resolve(&table()).unwrap(),
            vec!["predicted_pae_interaction_t1", "predicted_pae_interaction_t2"]
        );
    }

    #[test]
    fn test_explicit_wins_and_keeps_order() {
        let sel = ColumnSelector {
            explicit: vec!["plddt".into(), "predicted_pae_interaction_t1".into()],
            include: vec!["pae".into()],
            exclude: vec![],
        };
        assert_eq!(sel.resolve(&table()).unwrap(), vec!["plddt", "predicted_pae_interaction_t1"]);
    }

    #[test]
    fn test_unknown_explicit_column() {
        let sel = ColumnSelector::explicit(["ipae"]);
        assert!(matches!(sel.resolve(&table()), Err(ParetoError::UnknownColumn(c)) if c == "ipae"));
    }

    #[test]
    fn test_no_match_is_error() {
        let sel = ColumnSelector::patterns(["rmsd"], Vec::<String>::new());
        assert!(matches!(sel.resolve(&table()), Err(ParetoError::EmptySelection)));
    }

    #[test]
    fn test_id_column_never_selected() {
        let sel = ColumnSelector::patterns(["a"], Vec::<String>::new());
        let chosen = sel.resolve(&table()).unwrap();
        assert!(!chosen.contains(&"name".to_string()));
    }

    #[test]
    fn test_from_config_defaults() {
        let sel = ColumnSelector::from(&ObjectiveConfig::default());
        assert_eq!(sel.resolve(&table()).unwrap().len(), 2);
    }
}
