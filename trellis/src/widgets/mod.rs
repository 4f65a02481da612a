//! Leaf widgets.

pub mod spacer;

pub use spacer::Spacer;
