//! Layout System for Trellis
//!
//! The pieces every layout algorithm shares: children storage and slots, the
//! per-axis alignment primitive, the filtered arrangement collector, stretch
//! distribution, the desired-size cache and the whole-tree driver.
//!
//! # Architecture
//!
//! ```text
//! prepass (bottom-up desired sizes) -> arrange (top-down geometries) -> painter / hit-test
//! ```

pub mod align;
pub mod arranged;
pub mod cache;
pub mod children;
pub mod context;
pub mod distribute;
pub mod length;

// Re-export core types
pub use align::{align_axis, align_child, AxisPlacement};
pub use arranged::{ArrangedChildren, ArrangedWidget};
pub use cache::{ChildKey, DesiredSizeCache, PrepassStats};
pub use children::{
    Children, NoChildren, PanelChildren, PanelSlot, SingleChild, SlotBase, SlotLayout, SwitcherChildren,
    WeakChild,
};
pub use context::{arrange_children_of, ArrangedNode, LayoutContext};
pub use distribute::{distribute_stretch, partial_sums, StretchAllocation, StretchInput};
pub use length::{Align, Padding, SizeParam};
