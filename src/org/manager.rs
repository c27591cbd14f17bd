use std::collections::HashSet;
use std::sync::Arc;

use super::EmployeeRecord;

/// Whether anyone in `records` reports to `id`.
///
/// Always ask against the full, unfiltered record set: a manager whose
/// reports are all filtered out of view is still a manager.
pub fn is_manager(id: &str, records: &[Arc<EmployeeRecord>]) -> bool {
    !id.is_empty() && records.iter().any(|r| r.manager_ref() == Some(id))
}

/// [`is_manager`] precomputed once per load, for per-card lookups.
#[derive(Debug, Clone, Default)]
pub struct ManagerIndex {
    ids: HashSet<String>,
}

impl ManagerIndex {
    pub fn build(records: &[Arc<EmployeeRecord>]) -> Self {
        let ids = records
            .iter()
            .filter_map(|r| r.manager_ref())
            .map(str::to_owned)
            .collect();
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_manager(&self, record: &EmployeeRecord) -> bool {
        record.id().is_some_and(|id| self.contains(id))
    }

    /// Number of distinct identifiers referenced as a manager.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::filter::{filter_forest, CompanyFilter};
    use crate::org::hierarchy::build_forest;
    use crate::org::testing::{record, records};

    #[test]
    fn detects_direct_reports() {
        let recs = records(&[("1", None), ("2", Some("1")), ("3", Some("2"))]);
        assert!(is_manager("1", &recs));
        assert!(is_manager("2", &recs));
        assert!(!is_manager("3", &recs));
        assert!(!is_manager("9", &recs));
    }

    #[test]
    fn unresolved_reference_still_counts() {
        // "9" is not a record, but someone names it as manager
        let recs = records(&[("4", Some("9"))]);
        assert!(is_manager("9", &recs));
    }

    #[test]
    fn empty_candidate_never_matches() {
        let recs = records(&[("1", Some("")), ("2", None)]);
        assert!(!is_manager("", &recs));
        let index = ManagerIndex::build(&recs);
        assert!(index.is_empty());
    }

    #[test]
    fn index_agrees_with_scan() {
        let recs = records(&[
            ("1", None),
            ("2", Some("1")),
            ("3", Some("1")),
            ("4", Some("2")),
            ("5", Some("7")),
        ]);
        let index = ManagerIndex::build(&recs);
        for candidate in ["1", "2", "3", "4", "5", "7", ""] {
            assert_eq!(index.contains(candidate), is_manager(candidate, &recs), "{candidate}");
        }
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn record_without_id_is_not_a_manager() {
        let recs = vec![record(0, None, None, None), record(1, Some("2"), Some(""), None)];
        let index = ManagerIndex::build(&recs);
        assert!(!index.is_manager(&recs[0]));
    }

    #[test]
    fn manager_flag_survives_filtering() {
        let recs = vec![
            record(0, Some("1"), None, Some("X")),
            record(1, Some("2"), Some("1"), Some("Y")),
        ];
        let forest = build_forest(&recs);
        let filtered = filter_forest(&forest, &CompanyFilter::company("X"));
        let boss = &filtered.roots()[0];
        assert!(boss.children.is_empty());

        let index = ManagerIndex::build(&recs);
        assert!(index.is_manager(&boss.record));
        assert!(is_manager("1", &recs));
    }
}
