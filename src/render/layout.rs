use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::org::{EmployeeRecord, Forest, NodeKey, TreeNode};

use super::visibility::VisibilityState;

/// Bounding box in chart coordinates (unscaled, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Card size and spacing, in chart pixels at 100 % zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardMetrics {
    pub width: f32,
    pub height: f32,
    /// Horizontal gap between sibling subtrees
    pub h_gap: f32,
    /// Vertical gap between depth rows
    pub v_gap: f32,
    /// Side of the square +/− toggle centered on the card's bottom edge
    pub toggle: f32,
}

impl Default for CardMetrics {
    fn default() -> Self {
        Self {
            width: 256.0,
            height: 120.0,
            h_gap: 16.0,
            v_gap: 48.0,
            toggle: 20.0,
        }
    }
}

/// One visible card.
#[derive(Debug, Clone)]
pub struct CardBox {
    pub key: NodeKey,
    pub record: Arc<EmployeeRecord>,
    pub bounds: LayoutBox,
    pub depth: usize,
    /// Children exist in the tree being drawn (drives the toggle)
    pub has_children: bool,
    pub collapsed: bool,
}

impl CardBox {
    /// Hit area of the +/− toggle, or `None` for leaves.
    pub fn toggle_bounds(&self, metrics: &CardMetrics) -> Option<LayoutBox> {
        if !self.has_children {
            return None;
        }
        let side = metrics.toggle;
        Some(LayoutBox {
            x: self.bounds.center_x() - side / 2.0,
            y: self.bounds.bottom() - side / 2.0,
            width: side,
            height: side,
        })
    }
}

/// Elbow from a parent's bottom edge down to a child's top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub points: [(f32, f32); 4],
}

/// Positioned cards (pre-order), their connectors and the total extent.
#[derive(Debug, Clone, Default)]
pub struct ChartLayout {
    pub cards: Vec<CardBox>,
    pub connectors: Vec<Connector>,
    pub width: f32,
    pub height: f32,
}

impl ChartLayout {
    pub fn card_at(&self, x: f32, y: f32) -> Option<&CardBox> {
        self.cards.iter().find(|c| c.bounds.contains(x, y))
    }

    /// Key of the card whose toggle covers the point.
    pub fn toggle_at(&self, x: f32, y: f32, metrics: &CardMetrics) -> Option<NodeKey> {
        self.cards
            .iter()
            .find(|c| c.toggle_bounds(metrics).is_some_and(|b| b.contains(x, y)))
            .map(|c| c.key)
    }
}

/// One visible card before placement. Slots are stored in pre-order, so a
/// parent always precedes its children.
struct Slot<'a> {
    node: &'a TreeNode,
    depth: usize,
    children: Vec<usize>,
    /// Width reserved for the whole visible subtree
    width: f32,
    /// Width of the children row alone
    span: f32,
    left: f32,
}

fn collect_visible<'a>(forest: &'a Forest, visibility: &VisibilityState) -> (Vec<Slot<'a>>, Vec<usize>) {
    let mut slots: Vec<Slot<'a>> = Vec::new();
    let mut roots = Vec::new();
    let mut stack: Vec<(&'a TreeNode, usize, Option<usize>)> =
        forest.roots().iter().rev().map(|r| (r, 0, None)).collect();

    while let Some((node, depth, parent)) = stack.pop() {
        let index = slots.len();
        match parent {
            Some(p) => slots[p].children.push(index),
            None => roots.push(index),
        }
        slots.push(Slot {
            node,
            depth,
            children: Vec::new(),
            width: 0.0,
            span: 0.0,
            left: 0.0,
        });
        stack.extend(
            visibility
                .visible_children(node)
                .iter()
                .rev()
                .map(|c| (c, depth + 1, Some(index))),
        );
    }
    (slots, roots)
}

fn row_span(widths: impl Iterator<Item = f32>, gap: f32) -> f32 {
    let (sum, n) = widths.fold((0.0, 0usize), |(s, n), w| (s + w, n + 1));
    if n == 0 {
        0.0
    } else {
        sum + gap * (n - 1) as f32
    }
}

/// Compute a top-down tidy layout for the visible part of `forest`.
///
/// Roots sit side by side on the first row. Each parent is centered over
/// the span of its visible children; a subtree narrower than its card is
/// centered under it. Cards come out in pre-order.
pub fn compute_layout(forest: &Forest, visibility: &VisibilityState, metrics: &CardMetrics) -> ChartLayout {
    let m = metrics;
    let (mut slots, roots) = collect_visible(forest, visibility);

    // Widths, children before parents
    for i in (0..slots.len()).rev() {
        let span = row_span(slots[i].children.iter().map(|&c| slots[c].width), m.h_gap);
        slots[i].span = span;
        slots[i].width = span.max(m.width);
    }

    let mut layout = ChartLayout {
        width: row_span(roots.iter().map(|&r| slots[r].width), m.h_gap),
        cards: Vec::with_capacity(slots.len()),
        ..ChartLayout::default()
    };

    let mut left = 0.0;
    for &r in &roots {
        slots[r].left = left;
        left += slots[r].width + m.h_gap;
    }

    // Positions, parents before children
    for i in 0..slots.len() {
        let slot = &slots[i];
        let depth = slot.depth;
        let bounds = LayoutBox {
            x: slot.left + (slot.width - m.width) / 2.0,
            y: depth as f32 * (m.height + m.v_gap),
            width: m.width,
            height: m.height,
        };
        layout.cards.push(CardBox {
            key: slot.node.key(),
            record: slot.node.record.clone(),
            bounds,
            depth,
            has_children: slot.node.has_children(),
            collapsed: visibility.is_collapsed(slot.node.key()),
        });

        let mid_y = bounds.bottom() + m.v_gap / 2.0;
        let child_top = (depth + 1) as f32 * (m.height + m.v_gap);
        let mut child_left = slot.left + (slot.width - slot.span) / 2.0;
        for k in 0..slots[i].children.len() {
            let c = slots[i].children[k];
            let child_x = child_left + slots[c].width / 2.0;
            layout.connectors.push(Connector {
                points: [
                    (bounds.center_x(), bounds.bottom()),
                    (bounds.center_x(), mid_y),
                    (child_x, mid_y),
                    (child_x, child_top),
                ],
            });
            slots[c].left = child_left;
            child_left += slots[c].width + m.h_gap;
        }
    }

    layout.height = match slots.iter().map(|s| s.depth).max() {
        Some(d) => (d + 1) as f32 * m.height + d as f32 * m.v_gap,
        None => 0.0,
    };
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::hierarchy::build_forest;
    use crate::org::testing::records;

    fn metrics() -> CardMetrics {
        CardMetrics {
            width: 100.0,
            height: 50.0,
            h_gap: 10.0,
            v_gap: 20.0,
            toggle: 10.0,
        }
    }

    fn ids(layout: &ChartLayout) -> Vec<&str> {
        layout.cards.iter().filter_map(|c| c.record.id()).collect()
    }

    #[test]
    fn empty_forest_has_no_extent() {
        let layout = compute_layout(&Forest::default(), &VisibilityState::new(), &metrics());
        assert!(layout.cards.is_empty());
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.height, 0.0);
    }

    #[test]
    fn parent_is_centered_over_children() {
        let forest = build_forest(&records(&[("1", None), ("2", Some("1")), ("3", Some("1"))]));
        let layout = compute_layout(&forest, &VisibilityState::new(), &metrics());

        assert_eq!(ids(&layout), vec!["1", "2", "3"]);
        let [one, two, three] = [&layout.cards[0], &layout.cards[1], &layout.cards[2]];
        assert_eq!(two.bounds.x, 0.0);
        assert_eq!(three.bounds.x, 110.0);
        assert_eq!(one.bounds.x, 55.0);
        assert_eq!(two.bounds.y, 70.0);
        assert_eq!(layout.width, 210.0);
        assert_eq!(layout.height, 120.0);
        assert_eq!(layout.connectors.len(), 2);
        assert_eq!(layout.connectors[0].points[0], (105.0, 50.0));
        assert_eq!(layout.connectors[0].points[3], (50.0, 70.0));
    }

    #[test]
    fn roots_are_laid_side_by_side() {
        let forest = build_forest(&records(&[("1", None), ("4", Some("9"))]));
        let layout = compute_layout(&forest, &VisibilityState::new(), &metrics());
        assert_eq!(layout.cards[1].bounds.x, 110.0);
        assert_eq!(layout.cards[1].depth, 0);
        assert_eq!(layout.height, 50.0);
    }

    #[test]
    fn single_child_is_centered_under_parent() {
        let forest = build_forest(&records(&[("1", None), ("2", Some("1"))]));
        let layout = compute_layout(&forest, &VisibilityState::new(), &metrics());
        assert_eq!(layout.cards[0].bounds.x, layout.cards[1].bounds.x);
        assert_eq!(layout.width, 100.0);
    }

    #[test]
    fn collapsed_subtree_is_omitted() {
        let forest = build_forest(&records(&[
            ("1", None),
            ("2", Some("1")),
            ("3", Some("2")),
            ("4", Some("1")),
        ]));
        let mut state = VisibilityState::new();
        state.toggle(forest.roots()[0].children[0].key());
        let layout = compute_layout(&forest, &state, &metrics());

        assert_eq!(ids(&layout), vec!["1", "2", "4"]);
        let two = &layout.cards[1];
        assert!(two.collapsed);
        assert!(two.has_children);
        assert!(two.toggle_bounds(&metrics()).is_some());
        assert_eq!(layout.height, 120.0);
    }

    #[test]
    fn toggle_hit_test_finds_card() {
        let forest = build_forest(&records(&[("1", None), ("2", Some("1"))]));
        let m = metrics();
        let layout = compute_layout(&forest, &VisibilityState::new(), &m);
        let root = &layout.cards[0];
        let hit = layout.toggle_at(root.bounds.center_x(), root.bounds.bottom(), &m);
        assert_eq!(hit, Some(root.key));

        let leaf = &layout.cards[1];
        assert!(leaf.toggle_bounds(&m).is_none());
        assert_eq!(layout.toggle_at(leaf.bounds.center_x(), leaf.bounds.bottom(), &m), None);
        assert_eq!(layout.card_at(leaf.bounds.x + 1.0, leaf.bounds.y + 1.0).map(|c| c.key), Some(leaf.key));
    }

    #[test]
    fn cards_never_overlap_on_a_row() {
        let forest = build_forest(&records(&[
            ("1", None),
            ("2", Some("1")),
            ("3", Some("1")),
            ("5", Some("2")),
            ("6", Some("2")),
            ("7", Some("3")),
            ("8", None),
        ]));
        let layout = compute_layout(&forest, &VisibilityState::new(), &metrics());
        for depth in 0..3 {
            let mut row: Vec<_> = layout.cards.iter().filter(|c| c.depth == depth).map(|c| c.bounds).collect();
            row.sort_by(|a, b| a.x.total_cmp(&b.x));
            for pair in row.windows(2) {
                assert!(pair[0].right() <= pair[1].x, "{pair:?}");
            }
        }
    }

    #[test]
    fn long_chain_lays_out_one_column() {
        let (cards, height, x) = crate::org::testing::run_on_small_stack(|| {
            let forest = build_forest(&crate::org::testing::chain(20_000));
            let layout = compute_layout(&forest, &VisibilityState::new(), &metrics());
            let x = layout.cards.iter().all(|c| c.bounds.x == 0.0);
            (layout.cards.len(), layout.height, x)
        });
        assert_eq!(cards, 20_000);
        assert_eq!(height, 20_000.0 * 50.0 + 19_999.0 * 20.0);
        assert!(x);
    }
}
