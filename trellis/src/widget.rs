//! Widget System
//!
//! The `Widget` trait is the contract every node of a layout tree implements.
//! Layout runs in two passes over a tree of shared widget handles:
//!
//! 1. **Prepass** (`compute_desired_size`): bottom-up. Every child has already
//!    cached its desired size when its parent computes its own, so a parent
//!    reads `child.desired_size()` and never recurses.
//!
//! 2. **Arrange** (`arrange_children`): top-down. Given its allotted geometry
//!    a widget derives one child geometry per visible child and pushes the
//!    pairs into an `ArrangedChildren` collector. The caller (a painter,
//!    hit-tester or `LayoutContext::arrange_tree`) recurses.
//!
//! Nodes are `Rc<RefCell<dyn Widget>>`. A parent owns its children through
//! its slots; the only non-owning edge is `WeakChild`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::geometry::Geometry;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::cache::DesiredSizeCache;
use crate::layout::children::{Children, NoChildren};
use crate::primitives::Size;
use crate::visibility::Visibility;

/// Shared handle to a widget node.
pub type WidgetRef = Rc<RefCell<dyn Widget>>;

/// Non-owning handle to a widget node.
pub type WeakWidgetRef = Weak<RefCell<dyn Widget>>;

/// Result of handling a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, propagate to parent.
    Ignored,

    /// Event was handled, don't propagate.
    Handled,

    /// Event was handled and the widget wants pointer capture (drag start).
    CapturePointer,

    /// Event was handled and the widget releases pointer capture (drag end).
    ReleasePointer,
}

impl EventResult {
    /// Check if the event was handled in any way.
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

// =========================================================================
// WidgetBase
// =========================================================================

/// State shared by every widget: visibility, a debug tag and the
/// desired-size cache written by the prepass.
#[derive(Debug, Clone, Default)]
pub struct WidgetBase {
    visibility: Visibility,
    tag: Option<String>,
    pub(crate) cache: DesiredSizeCache,
}

impl WidgetBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visibility(visibility: Visibility) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        if self.visibility != visibility {
            self.visibility = visibility;
            self.cache.invalidate();
        }
    }

    /// Optional name used in debug output and blueprint references.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = Some(tag.into());
    }

    #[inline]
    pub fn cache(&self) -> &DesiredSizeCache {
        &self.cache
    }

    /// Mark the cached desired size stale.
    #[inline]
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}

// =========================================================================
// Widget trait
// =========================================================================

/// A node in the layout tree.
pub trait Widget {
    fn base(&self) -> &WidgetBase;

    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Short type name for logs and the inspect tool.
    fn type_name(&self) -> &'static str;

    /// Compute the size this widget would like to be.
    ///
    /// Must be a pure function of the widget's own state and its children's
    /// cached `desired_size()`. Called by the prepass only.
    fn compute_desired_size(&self, layout_scale: f32) -> Size;

    /// Read-only view over this widget's children.
    fn children(&self) -> &dyn Children {
        &NoChildren
    }

    /// Place every child that passes the collector's filter.
    fn arrange_children(&self, _allotted: &Geometry, _arranged: &mut ArrangedChildren) {}

    /// Extra scale applied to the child at `child_index` relative to this
    /// widget's own layout scale.
    fn relative_layout_scale(&self, _child_index: usize) -> f32 {
        1.0
    }

    #[inline]
    fn visibility(&self) -> Visibility {
        self.base().visibility()
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.base_mut().set_visibility(visibility);
    }

    /// Desired size cached by the last prepass. Zero before the first one
    /// and for collapsed widgets.
    #[inline]
    fn desired_size(&self) -> Size {
        self.base().cache().size()
    }

    /// Mark this widget's cached desired size stale.
    fn invalidate(&mut self) {
        self.base_mut().invalidate();
    }

    /// Label used in debug output: the tag when set, else the type name.
    fn debug_label(&self) -> String {
        match self.base().tag() {
            Some(tag) => format!("{}#{}", self.type_name(), tag),
            None => self.type_name().to_string(),
        }
    }
}

/// Extension trait for wrapping widgets in shared handles.
pub trait WidgetExt: Widget {
    /// Set the initial visibility.
    fn with_visibility(mut self, visibility: Visibility) -> Self
    where
        Self: Sized,
    {
        self.set_visibility(visibility);
        self
    }

    /// Set the debug tag.
    fn tagged(mut self, tag: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().set_tag(tag);
        self
    }

    /// Wrap this widget as a tree node.
    fn into_ref(self) -> WidgetRef
    where
        Self: Sized + 'static,
    {
        Rc::new(RefCell::new(self))
    }

    /// Wrap this widget keeping its concrete type, for callers that need to
    /// mutate it after attaching it to a parent.
    fn into_shared(self) -> Rc<RefCell<Self>>
    where
        Self: Sized,
    {
        Rc::new(RefCell::new(self))
    }
}

impl<W: Widget> WidgetExt for W {}

// =========================================================================
// Null widget
// =========================================================================

/// Placeholder stored in slots that have no real child.
///
/// Collapsed, zero-sized and childless. A single instance per thread is
/// shared by every empty slot, so it must not be mutated.
pub struct NullWidget {
    base: WidgetBase,
}

impl Widget for NullWidget {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "NullWidget"
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        Size::ZERO
    }
}

thread_local! {
    static NULL_WIDGET: WidgetRef = Rc::new(RefCell::new(NullWidget {
        base: WidgetBase::with_visibility(Visibility::Collapsed),
    }));
}

/// The shared placeholder widget.
pub fn null_widget() -> WidgetRef {
    NULL_WIDGET.with(Rc::clone)
}

/// Whether `widget` is the shared placeholder.
pub fn is_null_widget(widget: &WidgetRef) -> bool {
    NULL_WIDGET.with(|null| Rc::ptr_eq(null, widget))
}
