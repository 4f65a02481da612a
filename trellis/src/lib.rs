//! Trellis: retained-mode layout engine
//!
//! Trellis arranges a tree of widgets. Every node reports the size it would
//! like to be, and every container turns its allotted geometry into one
//! geometry per visible child. It has no renderer and no input loop: a
//! painter or hit-tester walks the arranged output.
//!
//! # Architecture
//!
//! ```text
//! Blueprint (JSON) -> widget tree -> prepass (desired sizes, bottom-up)
//!                                 -> arrange (child geometries, top-down)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use trellis::{BoxPanel, BoxSlot, Geometry, LayoutContext, Size, Spacer, VisibilityFilter, WidgetExt};
//!
//! let root = BoxPanel::horizontal()
//!     .slot(BoxSlot::new(Spacer::new(50.0, 10.0).into_ref()).auto_size())
//!     .slot(BoxSlot::new(Spacer::new(10.0, 10.0).into_ref()))
//!     .into_ref();
//!
//! let mut ctx = LayoutContext::new();
//! ctx.prepass(&root, 1.0);
//! let nodes = ctx.arrange_tree(&root, &Geometry::root(Size::new(300.0, 40.0), 1.0), VisibilityFilter::LAYOUT);
//! ```

// Core primitives
pub mod primitives;
pub mod geometry;
pub mod visibility;

// Widget system
pub mod widget;
pub mod widgets;

// Layout system (shared machinery and algorithms)
pub mod layout;
pub mod panels;

// Declarative configuration
pub mod blueprint;

// Re-export core types
pub use primitives::{Orientation, Point, Rect, Size};
pub use geometry::{Geometry, LayoutTransform};
pub use visibility::{Visibility, VisibilityFilter};
pub use widget::{
    is_null_widget, null_widget, EventResult, WeakWidgetRef, Widget, WidgetBase, WidgetExt, WidgetRef,
};
pub use widgets::Spacer;

// Re-export layout machinery
pub use layout::{
    align_axis, align_child, arrange_children_of, Align, ArrangedChildren, ArrangedNode, ArrangedWidget,
    AxisPlacement, Children, LayoutContext, Padding, PanelSlot, PrepassStats, SizeParam, SlotLayout,
};

// Re-export panels
pub use panels::{
    Border, BoxPanel, BoxSlot, GridPanel, GridSlot, Overlay, OverlaySlot, ResizeMode, ResponsiveGridPanel,
    ResponsiveSlot, Scaler, SizeRule, Splitter, SplitterSlot, SwitcherSlot, UniformGridPanel, UniformGridSlot,
    WeakHost, WidgetSwitcher, WrapBox, WrapSlot,
};

pub use blueprint::{Blueprint, BlueprintError};
