//! Composition of the filtered table and the convergence report.
//!
//! Row selection (which specimens are emitted) and column selection (which
//! SVs pass the prevalence vote) are independent decisions applied to the
//! same list of specimen outcomes.

use crate::data::{SequenceTable, SpecimenOutcome};
use crate::error::Result;
use crate::filter::PrevalenceDecision;
use serde::{Deserialize, Serialize};

/// One row of the convergence report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceRecord {
    pub specimen: String,
    pub goods_converged: bool,
}

/// Indices of the specimens that will be emitted as rows.
///
/// Converged specimens are always emitted; specimens that did not converge
/// only when `keep_nonconverged` is set.
pub fn select_rows(outcomes: &[SpecimenOutcome], keep_nonconverged: bool) -> Vec<usize> {
    outcomes
        .iter()
        .enumerate()
        .filter(|(_, o)| keep_nonconverged || o.is_converged())
        .map(|(i, _)| i)
        .collect()
}

/// Build the filtered sequence table.
///
/// Columns are the SVs passing `decision`, in original order; rows are the
/// specimens chosen by [`select_rows`], in input order, holding their
/// thresholded counts.
pub fn assemble_filtered_table(
    sv_ids: &[String],
    outcomes: &[SpecimenOutcome],
    decision: &PrevalenceDecision,
    keep_nonconverged: bool,
) -> Result<SequenceTable> {
    let rows = outcomes
        .iter()
        .map(|o| (o.specimen.clone(), o.filtered.clone()))
        .collect();
    let thresholded = SequenceTable::from_rows(sv_ids.to_vec(), rows)?;

    thresholded
        .subset_specimens(&select_rows(outcomes, keep_nonconverged))?
        .subset_svs(&decision.passing_indices())
}

/// Convergence flag for every specimen, in input order.
pub fn convergence_report(outcomes: &[SpecimenOutcome]) -> Vec<ConvergenceRecord> {
    outcomes
        .iter()
        .map(|o| ConvergenceRecord {
            specimen: o.specimen.clone(),
            goods_converged: o.is_converged(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Convergence;
    use crate::filter::filter_prevalence;

    fn outcome(specimen: &str, convergence: Convergence, filtered: Vec<u64>) -> SpecimenOutcome {
        SpecimenOutcome {
            specimen: specimen.to_string(),
            depth: filtered.iter().sum(),
            convergence,
            filtered,
            curve: None,
        }
    }

    fn create_test_outcomes() -> Vec<SpecimenOutcome> {
        vec![
            outcome("s1", Convergence::Converged { threshold: 5 }, vec![9, 0, 0]),
            outcome("s2", Convergence::NotConverged, vec![2, 3, 0]),
            outcome("s3", Convergence::Converged { threshold: 2 }, vec![4, 0, 2]),
            outcome("empty", Convergence::NotConverged, vec![0, 0, 0]),
        ]
    }

    fn sv_ids() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    #[test]
    fn test_select_rows() {
        let outcomes = create_test_outcomes();
        assert_eq!(select_rows(&outcomes, false), vec![0, 2]);
        assert_eq!(select_rows(&outcomes, true), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_assemble_converged_only() {
        let outcomes = create_test_outcomes();
        let decision = filter_prevalence(&outcomes, 3, 1).unwrap();
        let table = assemble_filtered_table(&sv_ids(), &outcomes, &decision, false).unwrap();

        assert_eq!(table.sv_ids(), &["A", "C"]);
        assert_eq!(table.specimen_ids(), &["s1", "s3"]);
        assert_eq!(table.row_dense(0), vec![9, 0]);
        assert_eq!(table.row_dense(1), vec![4, 2]);
    }

    #[test]
    fn test_assemble_keep_nonconverged() {
        let outcomes = create_test_outcomes();
        let decision = filter_prevalence(&outcomes, 3, 1).unwrap();
        let table = assemble_filtered_table(&sv_ids(), &outcomes, &decision, true).unwrap();

        // B is only seen in a specimen that did not converge, so the column is dropped
        assert_eq!(table.sv_ids(), &["A", "C"]);
        assert_eq!(table.specimen_ids(), &["s1", "s2", "s3", "empty"]);
        assert_eq!(table.row_dense(1), vec![2, 0]);
        assert_eq!(table.row_dense(3), vec![0, 0]);
    }

    #[test]
    fn test_convergence_report() {
        let report = convergence_report(&create_test_outcomes());
        let flags: Vec<(&str, bool)> = report
            .iter()
            .map(|r| (r.specimen.as_str(), r.goods_converged))
            .collect();
        assert_eq!(
            flags,
            vec![("s1", true), ("s2", false), ("s3", true), ("empty", false)]
        );
    }
}
