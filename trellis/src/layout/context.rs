//! Whole-tree layout driver.
//!
//! The LayoutContext runs the two passes over a widget tree:
//! - `prepass`: depth-first, children before parents, filling every widget's
//!   desired-size cache
//! - `arrange_tree`: top-down, asking each widget to arrange its children
//!   and recursing into the results, producing a flat paint-ordered list
//!
//! It also carries per-pass counters and, in debug builds, the current depth
//! for trace output.

use std::rc::Rc;

use super::arranged::{ArrangedChildren, ArrangedWidget};
use super::cache::{ChildKey, PrepassStats};
use crate::geometry::Geometry;
use crate::primitives::{Point, Size};
use crate::visibility::VisibilityFilter;
use crate::widget::WidgetRef;

/// One entry of a flattened arrangement: an arranged widget and its depth
/// below the root (the root is depth 0).
#[derive(Debug, Clone)]
pub struct ArrangedNode {
    pub depth: usize,
    pub entry: ArrangedWidget,
}

/// Arrange the direct children of `widget` within `allotted`.
pub fn arrange_children_of(
    widget: &WidgetRef,
    allotted: &Geometry,
    filter: VisibilityFilter,
) -> ArrangedChildren {
    let mut arranged = ArrangedChildren::new(filter);
    widget.borrow().arrange_children(allotted, &mut arranged);
    arranged
}

/// Layout driver carrying per-pass counters.
#[derive(Debug, Default)]
pub struct LayoutContext {
    stats: PrepassStats,
    nodes_arranged: u64,
}

impl LayoutContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters from the last prepass.
    #[inline]
    pub fn stats(&self) -> PrepassStats {
        self.stats
    }

    /// Compute and cache the desired size of every widget under `root`.
    /// Returns the root's desired size.
    pub fn prepass(&mut self, root: &WidgetRef, layout_scale: f32) -> Size {
        self.stats = PrepassStats::default();
        self.prepass_node(root, layout_scale, 0);

        tracing::debug!(
            hits = self.stats.hits,
            misses = self.stats.misses,
            "prepass complete"
        );
        root.borrow().desired_size()
    }

    /// Returns whether the node's cached size changed.
    fn prepass_node(&mut self, widget: &WidgetRef, layout_scale: f32, depth: usize) -> bool {
        // Snapshot the children up front so num/child_at stay consistent.
        let (children, collapsed) = {
            let node = widget.borrow();
            if node.visibility().is_collapsed() {
                (Vec::new(), true)
            } else {
                let children = node.children();
                let list: Vec<(WidgetRef, f32)> = (0..children.num())
                    .map(|index| (children.child_at(index), node.relative_layout_scale(index)))
                    .collect();
                (list, false)
            }
        };

        if collapsed {
            let mut node = widget.borrow_mut();
            node.base_mut().cache.record_children(Vec::new());
            return node.base_mut().cache.store(Size::ZERO, layout_scale);
        }

        let mut any_child_changed = false;
        for (child, relative_scale) in &children {
            any_child_changed |= self.prepass_node(child, layout_scale * relative_scale, depth + 1);
        }

        let keys: Vec<ChildKey> = children.iter().map(|(child, _)| ChildKey::of(child)).collect();
        let reusable = {
            let node = widget.borrow();
            let cache = node.base().cache();
            cache.is_valid_for(layout_scale) && cache.children_match(&keys)
        };
        if reusable && !any_child_changed {
            self.stats.hits += 1;
            return false;
        }

        self.stats.misses += 1;
        let desired = widget.borrow().compute_desired_size(layout_scale);
        let mut node = widget.borrow_mut();
        tracing::trace!(
            depth,
            widget = %node.debug_label(),
            width = desired.width,
            height = desired.height,
            "desired size"
        );
        node.base_mut().cache.record_children(keys);
        node.base_mut().cache.store(desired, layout_scale)
    }

    /// Recursively arrange the whole tree under `root`.
    ///
    /// The result is in paint order: each widget precedes its descendants
    /// and siblings follow child order. The root itself is the first entry
    /// when it passes `filter`; otherwise the result is empty.
    pub fn arrange_tree(
        &mut self,
        root: &WidgetRef,
        geometry: &Geometry,
        filter: VisibilityFilter,
    ) -> Vec<ArrangedNode> {
        self.nodes_arranged = 0;
        let mut out = Vec::new();

        let mut top = ArrangedChildren::new(filter);
        if top.add_widget(Rc::clone(root), *geometry) {
            for entry in top.into_vec() {
                self.arrange_node(entry, 0, filter, &mut out);
            }
        }

        tracing::debug!(nodes = self.nodes_arranged, "arrange complete");
        out
    }

    fn arrange_node(
        &mut self,
        entry: ArrangedWidget,
        depth: usize,
        filter: VisibilityFilter,
        out: &mut Vec<ArrangedNode>,
    ) {
        self.nodes_arranged += 1;
        let arranged = arrange_children_of(&entry.widget, &entry.geometry, filter);

        tracing::trace!(
            depth,
            widget = %entry.widget.borrow().debug_label(),
            x = entry.geometry.absolute_position().x,
            y = entry.geometry.absolute_position().y,
            width = entry.geometry.size.width,
            height = entry.geometry.size.height,
            children = arranged.len(),
            "arranged"
        );

        out.push(ArrangedNode { depth, entry });
        for child in arranged.into_vec() {
            self.arrange_node(child, depth + 1, filter, out);
        }
    }

    /// Path from the outermost to the deepest hit-testable widget under an
    /// absolute point. Empty when nothing can be hit.
    ///
    /// Later siblings are tested first since they paint on top.
    pub fn hit_test(&mut self, root: &WidgetRef, geometry: &Geometry, point: Point) -> Vec<WidgetRef> {
        let mut path = Vec::new();
        Self::hit_test_node(root, geometry, point, &mut path);
        path
    }

    fn hit_test_node(widget: &WidgetRef, geometry: &Geometry, point: Point, path: &mut Vec<WidgetRef>) -> bool {
        let visibility = widget.borrow().visibility();
        if visibility.is_collapsed() || !geometry.is_under_location(point) {
            return false;
        }

        let self_hit = visibility.is_hit_testable();
        if self_hit {
            path.push(Rc::clone(widget));
        }

        if visibility.are_children_hit_testable() {
            let filter = VisibilityFilter::SELF_HIT_TEST | VisibilityFilter::CHILDREN_HIT_TEST;
            let arranged = arrange_children_of(widget, geometry, filter);
            for child in arranged.iter().rev() {
                if Self::hit_test_node(&child.widget, &child.geometry, point, path) {
                    return true;
                }
            }
        }

        self_hit
    }
}
