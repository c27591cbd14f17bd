//! Per-node collapse flags.
//!
//! Owned by whatever draws the chart. Keys are [`NodeKey`]s (input row
//! positions), so flags stay put while the company filter changes and are
//! dropped with [`VisibilityState::reset`] when a new file is loaded. A node
//! nobody has touched reads as expanded.
//!
//! A record linked more than once (several rows sharing its `Id`) appears as
//! several copies in the forest. The copies share one key, so collapsing any
//! of them collapses all of them.

use std::collections::HashMap;

use crate::org::{NodeKey, TreeNode};

#[derive(Debug, Clone, Default)]
pub struct VisibilityState {
    collapsed: HashMap<NodeKey, bool>,
}

impl VisibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, key: NodeKey) -> bool {
        self.collapsed.get(&key).copied().unwrap_or(false)
    }

    /// Flip the flag and return the new state (`true` = collapsed).
    pub fn toggle(&mut self, key: NodeKey) -> bool {
        let flag = self.collapsed.entry(key).or_insert(false);
        *flag = !*flag;
        log::debug!("node {:?} collapsed = {}", key, *flag);
        *flag
    }

    pub fn set_collapsed(&mut self, key: NodeKey, collapsed: bool) {
        self.collapsed.insert(key, collapsed);
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Forget every flag; everything reads as expanded again.
    pub fn reset(&mut self) {
        self.collapsed.clear();
    }

    /// Children to draw under `node`: none while it is collapsed.
    pub fn visible_children<'a>(&self, node: &'a TreeNode) -> &'a [TreeNode] {
        if self.is_collapsed(node.key()) {
            &[]
        } else {
            &node.children
        }
    }

    /// The +/− affordance is offered whenever the node has children in the
    /// tree being drawn, collapsed or not.
    pub fn shows_toggle(&self, node: &TreeNode) -> bool {
        node.has_children()
    }

    /// Number of nodes currently collapsed.
    pub fn collapsed_count(&self) -> usize {
        self.collapsed.values().filter(|&&c| c).count()
    }
}
