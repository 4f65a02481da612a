//! Slot sizing and alignment attributes.
//!
//! Core types shared by every slot: how a child is sized along a panel's
//! main axis, where it sits on each axis, and the padding around it.

use serde::{Deserialize, Serialize};

use crate::primitives::{Orientation, Size};

/// Sizing rule for a child along a panel's main axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeParam {
    /// Use the child's desired size (optionally clamped by the slot's max size).
    Auto,
    /// Take a proportional share of the space left after auto children and
    /// margins. The value is the stretch coefficient.
    Stretch(f32),
}

impl Default for SizeParam {
    fn default() -> Self {
        SizeParam::Stretch(1.0)
    }
}

impl SizeParam {
    /// Stretch coefficient, or 0 for auto-sized children.
    pub fn coefficient(&self) -> f32 {
        match self {
            SizeParam::Auto => 0.0,
            SizeParam::Stretch(value) => *value,
        }
    }

    pub fn is_stretch(&self) -> bool {
        matches!(self, SizeParam::Stretch(_))
    }
}

/// Placement of a child within its slot along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// Take the whole slot minus margins.
    #[default]
    Fill,
    /// Left or top.
    Start,
    Center,
    /// Right or bottom.
    End,
}

/// Padding around a child, inside its slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub bottom: f32,
    #[serde(default)]
    pub left: f32,
}

impl Padding {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Create padding with explicit values for each side.
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    /// Uniform padding on all sides.
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Symmetric padding (horizontal, vertical).
    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Total horizontal padding.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical padding.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total padding along an axis.
    pub fn along(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.horizontal(),
            Orientation::Vertical => self.vertical(),
        }
    }

    /// Left or top.
    pub fn leading(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.left,
            Orientation::Vertical => self.top,
        }
    }

    /// Right or bottom.
    pub fn trailing(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.right,
            Orientation::Vertical => self.bottom,
        }
    }

    /// Space the padding adds to a desired size.
    pub fn desired_size(&self) -> Size {
        Size::new(self.horizontal(), self.vertical())
    }
}
