//! Border - single-child container with padding, alignment and size
//! overrides.

use crate::geometry::Geometry;
use crate::layout::align::align_child;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{Children, SingleChild};
use crate::layout::length::{Align, Padding};
use crate::primitives::{Orientation, Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

/// Optional overrides applied to one axis of a border's desired size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisOverride {
    exact: Option<f32>,
    min: Option<f32>,
    max: Option<f32>,
}

impl AxisOverride {
    /// An exact override wins. Otherwise clamp to min, then max.
    fn apply(&self, length: f32) -> f32 {
        if let Some(exact) = self.exact {
            return exact;
        }
        let mut length = length;
        if let Some(min) = self.min {
            length = length.max(min);
        }
        if let Some(max) = self.max {
            length = length.min(max);
        }
        length
    }
}

/// Wraps exactly one child. An empty border holds the null widget.
#[derive(Default)]
pub struct Border {
    base: WidgetBase,
    child: SingleChild,
    width: AxisOverride,
    height: AxisOverride,
}

impl Border {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the child.
    pub fn content(mut self, widget: WidgetRef) -> Self {
        self.child.slot.attach(widget);
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.child.slot.layout.padding = padding;
        self
    }

    pub fn h_align(mut self, align: Align) -> Self {
        self.child.slot.layout.h_align = align;
        self
    }

    pub fn v_align(mut self, align: Align) -> Self {
        self.child.slot.layout.v_align = align;
        self
    }

    pub fn width_override(mut self, width: f32) -> Self {
        self.width.exact = Some(width);
        self
    }

    pub fn height_override(mut self, height: f32) -> Self {
        self.height.exact = Some(height);
        self
    }

    pub fn min_desired_width(mut self, width: f32) -> Self {
        self.width.min = Some(width);
        self
    }

    pub fn max_desired_width(mut self, width: f32) -> Self {
        self.width.max = Some(width);
        self
    }

    pub fn min_desired_height(mut self, height: f32) -> Self {
        self.height.min = Some(height);
        self
    }

    pub fn max_desired_height(mut self, height: f32) -> Self {
        self.height.max = Some(height);
        self
    }

    pub fn widget(&self) -> &WidgetRef {
        self.child.widget()
    }

    /// Replace the child, returning the previous one.
    pub fn set_content(&mut self, widget: WidgetRef) -> WidgetRef {
        self.base.invalidate();
        self.child.slot.attach(widget)
    }

    /// Remove the child, leaving the border empty.
    pub fn clear_content(&mut self) -> WidgetRef {
        self.base.invalidate();
        self.child.slot.detach()
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.child.slot.layout.padding = padding;
        self.base.invalidate();
    }
}

impl Widget for Border {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Border"
    }

    fn children(&self) -> &dyn Children {
        &self.child
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        let child = self.child.widget().borrow();
        let content = if child.visibility().is_collapsed() {
            Size::ZERO
        } else {
            child.desired_size()
        };
        let padded = content + self.child.slot.layout.padding.desired_size();
        Size::new(self.width.apply(padded.width), self.height.apply(padded.height))
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        let before = arranged.len();
        let layout = &self.child.slot.layout;
        let desired = self.child.widget().borrow().desired_size();
        let x = align_child(Orientation::Horizontal, allotted.size.width, layout, desired);
        let y = align_child(Orientation::Vertical, allotted.size.height, layout, desired);
        arranged.add_widget(
            self.child.widget().clone(),
            allotted.make_child(Point::new(x.offset, y.offset), Size::new(x.length, y.length), 1.0),
        );
        assert!(arranged.len() - before <= 1, "Border arranged more than one child");
    }
}
