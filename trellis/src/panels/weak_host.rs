//! WeakHost - shows a widget owned elsewhere.

use crate::geometry::Geometry;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{Children, WeakChild};
use crate::primitives::{Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

/// Arranges a non-owned widget over its whole area while that widget is
/// alive, and nothing once it has been dropped.
#[derive(Default)]
pub struct WeakHost {
    base: WidgetBase,
    target: WeakChild,
}

impl WeakHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `set_target`.
    pub fn target(mut self, widget: &WidgetRef) -> Self {
        self.target.attach(widget);
        self
    }

    pub fn set_target(&mut self, widget: &WidgetRef) {
        self.target.attach(widget);
        self.base.invalidate();
    }

    pub fn clear_target(&mut self) {
        self.target.detach();
        self.base.invalidate();
    }

    pub fn is_alive(&self) -> bool {
        self.target.is_alive()
    }
}

impl Widget for WeakHost {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "WeakHost"
    }

    fn children(&self) -> &dyn Children {
        &self.target
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        match self.target.upgrade() {
            Some(widget) => {
                let widget = widget.borrow();
                if widget.visibility().is_collapsed() {
                    Size::ZERO
                } else {
                    widget.desired_size()
                }
            }
            None => Size::ZERO,
        }
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        if let Some(widget) = self.target.upgrade() {
            arranged.add_widget(widget, allotted.make_child(Point::ORIGIN, allotted.size, 1.0));
        }
    }
}
