//! Layout panels.
//!
//! Each panel owns a children container and implements one arrangement
//! algorithm over it. Panels never recurse into grandchildren: the prepass
//! has already cached every child's desired size, and the caller recurses
//! after `arrange_children` returns.

// Linear and grid layouts
pub mod box_panel;
pub mod grid_panel;
pub mod uniform_grid;
pub mod responsive_grid;

// Flowing and interactive layouts
pub mod wrap_box;
pub mod splitter;

// Single-child and stacking containers
pub mod border;
pub mod overlay;
pub mod scaler;
pub mod switcher;
pub mod weak_host;

// Re-export panel types
pub use border::Border;
pub use box_panel::{BoxPanel, BoxSlot};
pub use grid_panel::{GridPanel, GridSlot};
pub use overlay::{Overlay, OverlaySlot};
pub use responsive_grid::{ResponsiveGridPanel, ResponsiveLayout, ResponsiveSlot, DEFAULT_TOTAL_COLUMNS};
pub use scaler::Scaler;
pub use splitter::{
    DragSession, HandleRegion, ResizeMode, SizeRule, SlotResizedCallback, Splitter, SplitterSlot, SplitterState,
    DEFAULT_HIT_DETECTION_HANDLE_SIZE, DEFAULT_MIN_CHILD_LENGTH, DEFAULT_PHYSICAL_HANDLE_SIZE,
};
pub use switcher::{SwitcherSlot, WidgetSwitcher};
pub use uniform_grid::{UniformGridPanel, UniformGridSlot};
pub use weak_host::WeakHost;
pub use wrap_box::{WrapBox, WrapSlot, DEFAULT_PREFERRED_WIDTH};
