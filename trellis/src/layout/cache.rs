//! Desired-size cache.
//!
//! Each widget keeps the size it reported in the last prepass together with
//! the layout scale it was computed at. The entry is dirty until the first
//! prepass and again after any mutation of the widget; a clean entry at the
//! same scale lets the prepass skip `compute_desired_size` for that node.
//!
//! The entry also remembers which children the size was computed from. A
//! child that was swapped, dropped or (un)collapsed can leave every cached
//! size untouched while still changing the parent's result, so the prepass
//! compares the child keys as well.

use std::rc::Rc;

use crate::primitives::Size;
use crate::widget::WidgetRef;

/// Identity of one child as seen by a prepass: the widget allocation and
/// whether it was collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildKey {
    addr: usize,
    collapsed: bool,
}

impl ChildKey {
    pub fn of(child: &WidgetRef) -> Self {
        Self {
            addr: Rc::as_ptr(child) as *const () as usize,
            collapsed: child.borrow().visibility().is_collapsed(),
        }
    }
}

/// The cached result of a widget's last desired-size computation.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredSizeCache {
    size: Size,
    layout_scale: f32,
    dirty: bool,
    children: Vec<ChildKey>,
}

impl Default for DesiredSizeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DesiredSizeCache {
    /// A dirty, zero-sized entry.
    pub const fn new() -> Self {
        Self {
            size: Size::ZERO,
            layout_scale: 1.0,
            dirty: true,
            children: Vec::new(),
        }
    }

    /// Last stored size (zero before the first prepass).
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the stored size can be reused at `layout_scale`.
    #[inline]
    pub fn is_valid_for(&self, layout_scale: f32) -> bool {
        !self.dirty && self.layout_scale == layout_scale
    }

    /// Whether `children` are the ones the stored size was computed from.
    #[inline]
    pub fn children_match(&self, children: &[ChildKey]) -> bool {
        self.children == children
    }

    /// Remember the children the next stored size is computed from.
    pub fn record_children(&mut self, children: Vec<ChildKey>) {
        self.children = children;
    }

    /// Mark the entry stale. Called by every mutation entry point.
    #[inline]
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Store a freshly computed size. Returns whether it differs from the
    /// previous one.
    pub fn store(&mut self, size: Size, layout_scale: f32) -> bool {
        debug_assert!(!size.width.is_nan(), "NaN desired width");
        debug_assert!(!size.height.is_nan(), "NaN desired height");
        let changed = self.size != size;
        self.size = size;
        self.layout_scale = layout_scale;
        self.dirty = false;
        changed
    }
}

/// Counters collected during one prepass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepassStats {
    /// Nodes whose cached size was reused.
    pub hits: u64,
    /// Nodes that recomputed their desired size.
    pub misses: u64,
}
