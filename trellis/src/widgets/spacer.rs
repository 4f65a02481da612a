//! Spacer - fixed-size leaf.

use crate::primitives::Size;
use crate::widget::{Widget, WidgetBase};

/// A childless widget that wants a fixed size.
#[derive(Debug, Clone, Default)]
pub struct Spacer {
    base: WidgetBase,
    size: Size,
}

impl Spacer {
    /// Create a spacer wanting `width` x `height`.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            base: WidgetBase::new(),
            size: Size::new(width, height),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Change the wanted size.
    pub fn set_size(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.base.invalidate();
        }
    }
}

impl Widget for Spacer {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Spacer"
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        self.size
    }
}
