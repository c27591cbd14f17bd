//! Flat records → manager hierarchy.
//!
//! Construction is the classic two-pass map-then-link:
//!
//! 1. index every record by `Id` (a later duplicate replaces the earlier entry),
//! 2. walk the records again in input order and append each one's node to its
//!    manager's child list, or to the roots when the manager is absent, empty
//!    or unknown.
//!
//! Linking happens on slot indices, so the result is a graph rather than a
//! tree: a record that names itself as manager becomes its own child, and a
//! duplicated `Id` attaches the winning node once per record carrying it.
//! Nothing here guards against cycles. The guard lives in
//! [`Hierarchy::to_forest`], which expands slots into owned [`TreeNode`]s and
//! refuses to re-enter a slot already on the current path.

use std::collections::HashMap;
use std::sync::Arc;

use super::{EmployeeRecord, Forest, TreeNode};

/// Slot-indexed result of the two linking passes.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    records: Vec<Arc<EmployeeRecord>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

/// Link records to their managers.
pub fn build_hierarchy(records: &[Arc<EmployeeRecord>]) -> Hierarchy {
    // Pass 1: Id → slot, last write wins
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (slot, record) in records.iter().enumerate() {
        if let Some(id) = record.id() {
            if let Some(shadowed) = by_id.insert(id, slot) {
                log::debug!(
                    "duplicate Id {:?}: row {} shadows row {}",
                    id,
                    record.row,
                    records[shadowed].row
                );
            }
        }
    }

    // Pass 2: link in input order
    let mut children = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();
    for (slot, record) in records.iter().enumerate() {
        let Some(id) = record.id() else {
            roots.push(slot);
            continue;
        };
        let linked = by_id.get(id).copied().unwrap_or(slot);

        match record.manager_ref().and_then(|m| by_id.get(m)) {
            Some(&manager) => children[manager].push(linked),
            None => roots.push(linked),
        }
    }

    Hierarchy {
        records: records.to_vec(),
        children,
        roots,
    }
}

/// Link records and expand the result into an owned forest.
pub fn build_forest(records: &[Arc<EmployeeRecord>]) -> Forest {
    build_hierarchy(records).to_forest()
}

/// Partially expanded node on the materialization stack.
struct Frame {
    slot: usize,
    next: usize,
    children: Vec<TreeNode>,
}

impl Frame {
    fn enter(slot: usize, on_path: &mut [bool]) -> Self {
        on_path[slot] = true;
        Frame {
            slot,
            next: 0,
            children: Vec::new(),
        }
    }
}

impl Hierarchy {
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn children(&self, slot: usize) -> &[usize] {
        &self.children[slot]
    }

    /// Expand the linked slots into owned trees, dropping back edges.
    pub fn to_forest(&self) -> Forest {
        let mut on_path = vec![false; self.records.len()];
        let roots = self
            .roots
            .iter()
            .map(|&slot| self.expand(slot, &mut on_path))
            .collect();
        Forest::new(roots)
    }

    /// Depth-first expansion of one root with an explicit stack, so chain
    /// depth is bounded by the heap rather than the thread stack.
    fn expand(&self, root: usize, on_path: &mut [bool]) -> TreeNode {
        let mut stack = Vec::new();
        let mut current = Frame::enter(root, on_path);
        loop {
            if let Some(&child) = self.children[current.slot].get(current.next) {
                current.next += 1;
                if on_path[child] {
                    log::warn!(
                        "manager cycle through Id {:?} (row {}); not expanding it again",
                        self.records[child].id().unwrap_or(""),
                        self.records[child].row
                    );
                } else {
                    stack.push(std::mem::replace(&mut current, Frame::enter(child, on_path)));
                }
                continue;
            }

            on_path[current.slot] = false;
            let node = TreeNode {
                record: Arc::clone(&self.records[current.slot]),
                children: current.children,
            };
            match stack.pop() {
                Some(parent) => {
                    current = parent;
                    current.children.push(node);
                }
                None => return node,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::testing::{outline, record, records};

    #[test]
    fn builds_single_root_with_ordered_children() {
        let forest = build_forest(&records(&[
            ("1", None),
            ("2", Some("1")),
            ("3", Some("1")),
        ]));
        assert_eq!(outline(forest.roots()), "1[2,3]");
    }

    #[test]
    fn unresolved_manager_becomes_root() {
        let forest = build_forest(&records(&[
            ("1", None),
            ("2", Some("1")),
            ("3", Some("1")),
            ("4", Some("9")),
        ]));
        assert_eq!(outline(forest.roots()), "1[2,3],4");
    }

    #[test]
    fn child_may_precede_its_manager() {
        let forest = build_forest(&records(&[
            ("3", Some("1")),
            ("1", None),
            ("2", Some("1")),
        ]));
        assert_eq!(outline(forest.roots()), "1[3,2]");
    }

    #[test]
    fn empty_manager_id_is_a_root() {
        let forest = build_forest(&records(&[("1", Some("")), ("2", Some("1"))]));
        assert_eq!(outline(forest.roots()), "1[2]");
    }

    #[test]
    fn record_without_id_is_always_a_root() {
        let recs = vec![
            record(0, Some("1"), None, None),
            record(1, None, Some("1"), None),
            record(2, Some("2"), Some("1"), None),
        ];
        let forest = build_forest(&recs);
        assert_eq!(forest.roots().len(), 2);
        assert_eq!(forest.roots()[0].record.row, 0);
        assert_eq!(forest.roots()[1].record.row, 1);
        assert_eq!(outline(&forest.roots()[0].children), "2");
    }

    #[test]
    fn deep_chain_keeps_levels() {
        let forest = build_forest(&records(&[
            ("ceo", None),
            ("cto", Some("ceo")),
            ("lead", Some("cto")),
            ("dev", Some("lead")),
            ("cfo", Some("ceo")),
        ]));
        assert_eq!(outline(forest.roots()), "ceo[cto[lead[dev]],cfo]");
    }

    #[test]
    fn duplicate_id_later_record_wins() {
        let recs = vec![
            record(0, Some("1"), None, None),
            record(1, Some("2"), Some("1"), None),
            record(2, Some("2"), Some("1"), None),
        ];
        let hierarchy = build_hierarchy(&recs);
        // both rows carrying Id 2 link the winning slot (row 2)
        assert_eq!(hierarchy.children(0), &[2, 2]);

        let forest = hierarchy.to_forest();
        let rows: Vec<_> = forest.roots()[0]
            .children
            .iter()
            .map(|c| c.record.row)
            .collect();
        assert_eq!(rows, vec![2, 2]);
    }

    #[test]
    fn duplicate_id_children_attach_to_winner() {
        let recs = vec![
            record(0, Some("1"), None, Some("early")),
            record(1, Some("1"), None, Some("late")),
            record(2, Some("2"), Some("1"), None),
        ];
        let forest = build_forest(&recs);
        // the late record is linked twice as a root; the child hangs off it
        assert_eq!(forest.roots().len(), 2);
        for root in forest.roots() {
            assert_eq!(root.record.row, 1);
            assert_eq!(root.children.len(), 1);
        }
    }

    #[test]
    fn self_loop_is_linked_but_not_expanded() {
        let recs = records(&[("1", None), ("2", Some("2"))]);
        let hierarchy = build_hierarchy(&recs);
        // "2" resolves its manager (itself), so it is its own child and not a root
        assert_eq!(hierarchy.children(1), &[1]);
        assert_eq!(hierarchy.roots(), &[0]);
        assert_eq!(outline(hierarchy.to_forest().roots()), "1");
    }

    #[test]
    fn self_managed_record_drops_out_of_forest() {
        let recs = records(&[("1", Some("1")), ("2", None)]);
        let forest = build_forest(&recs);
        assert_eq!(outline(forest.roots()), "2");
    }

    #[test]
    fn cycle_reached_through_duplicate_is_cut() {
        // row 0 roots the winning "1" (row 1), whose manager "2" reports back to "1"
        let recs = records(&[("1", None), ("1", Some("2")), ("2", Some("1"))]);
        let hierarchy = build_hierarchy(&recs);
        assert_eq!(hierarchy.roots(), &[1]);
        assert_eq!(hierarchy.children(1), &[2]);
        assert_eq!(hierarchy.children(2), &[1]);
        assert_eq!(outline(hierarchy.to_forest().roots()), "1[2]");
    }

    #[test]
    fn two_node_cycle_is_unreachable() {
        let recs = records(&[("a", Some("b")), ("b", Some("a")), ("c", None)]);
        let forest = build_forest(&recs);
        assert_eq!(outline(forest.roots()), "c");
    }

    #[test]
    fn unique_ids_place_every_record_once() {
        let recs = records(&[
            ("1", None),
            ("2", Some("1")),
            ("3", Some("x")),
            ("4", Some("2")),
            ("5", Some("3")),
            ("6", None),
        ]);
        let forest = build_forest(&recs);
        assert_eq!(forest.node_count(), recs.len());
        let mut rows: Vec<_> = forest.iter().map(|n| n.record.row).collect();
        rows.sort_unstable();
        assert_eq!(rows, (0..recs.len()).collect::<Vec<_>>());
        assert_eq!(outline(forest.roots()), "1[2[4]],3[5],6");
    }

    #[test]
    fn long_chain_builds_without_recursion() {
        let (count, deepest) = crate::org::testing::run_on_small_stack(|| {
            let forest = build_forest(&crate::org::testing::chain(20_000));
            (forest.node_count(), forest.iter().map(|n| n.record.row).max())
        });
        assert_eq!(count, 20_000);
        assert_eq!(deepest, Some(19_999));
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        let forest = build_forest(&[]);
        assert!(forest.is_empty());
    }
}
