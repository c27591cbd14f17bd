use std::borrow::Cow;
use std::fmt;

use crate::company::{self, CompanyPalette};

use super::{Forest, TreeNode};

/// Active company selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CompanyFilter {
    /// No filtering
    #[default]
    All,
    Company(String),
}

impl CompanyFilter {
    pub fn company(token: impl Into<String>) -> Self {
        CompanyFilter::Company(token.into())
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            CompanyFilter::All => None,
            CompanyFilter::Company(t) => Some(t),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CompanyFilter::All)
    }
}

impl fmt::Display for CompanyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyFilter::All => f.write_str("All companies"),
            CompanyFilter::Company(t) => f.write_str(t),
        }
    }
}

/// Selector entries: `All` first, then each palette company in palette order.
pub fn filter_options(palette: &CompanyPalette) -> Vec<CompanyFilter> {
    std::iter::once(CompanyFilter::All)
        .chain(palette.tokens().map(CompanyFilter::company))
        .collect()
}

/// Keep only the lineage leading to nodes of the selected company.
///
/// `All` borrows the input untouched. Otherwise a fresh forest is built
/// bottom-up: a node survives when it belongs to the company itself or when
/// anything below it does, and in both cases its children are the filtered
/// children. A matching manager therefore loses every branch that holds no
/// match. The input is never mutated; record payloads are shared.
pub fn filter_forest<'a>(forest: &'a Forest, filter: &CompanyFilter) -> Cow<'a, Forest> {
    match filter {
        CompanyFilter::All => Cow::Borrowed(forest),
        CompanyFilter::Company(token) => {
            Cow::Owned(Forest::new(filter_nodes(forest.roots(), token)))
        }
    }
}

pub fn filter_nodes(nodes: &[TreeNode], token: &str) -> Vec<TreeNode> {
    nodes.iter().filter_map(|n| filter_node(n, token)).collect()
}

struct Frame<'a> {
    node: &'a TreeNode,
    next: usize,
    kept: Vec<TreeNode>,
}

impl<'a> Frame<'a> {
    fn new(node: &'a TreeNode) -> Self {
        Frame {
            node,
            next: 0,
            kept: Vec::new(),
        }
    }
}

/// Post-order walk with an explicit stack: children are filtered before the
/// node itself decides whether it survives.
fn filter_node(root: &TreeNode, token: &str) -> Option<TreeNode> {
    let mut stack = Vec::new();
    let mut current = Frame::new(root);
    loop {
        let node = current.node;
        if let Some(child) = node.children.get(current.next) {
            current.next += 1;
            stack.push(std::mem::replace(&mut current, Frame::new(child)));
            continue;
        }

        let self_matches = company::has_token(node.record.company().as_deref(), token);
        let kept = if self_matches || !current.kept.is_empty() {
            Some(TreeNode {
                record: node.record.clone(),
                children: current.kept,
            })
        } else {
            None
        };
        match stack.pop() {
            Some(parent) => {
                current = parent;
                current.kept.extend(kept);
            }
            None => return kept,
        }
    }
}
