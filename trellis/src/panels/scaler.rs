//! Scaler - applies a uniform layout scale to its child.

use crate::geometry::Geometry;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{Children, SingleChild};
use crate::primitives::{Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

/// Lays its child out in a space scaled by `scale`.
///
/// The child sees `allotted / scale` as its local size, and everything it
/// arranges is scaled back up by the accumulated transform.
pub struct Scaler {
    base: WidgetBase,
    child: SingleChild,
    scale: f32,
}

impl Default for Scaler {
    fn default() -> Self {
        Self {
            base: WidgetBase::new(),
            child: SingleChild::default(),
            scale: 1.0,
        }
    }
}

impl Scaler {
    pub fn new(scale: f32) -> Self {
        assert!(scale.is_finite() && scale > 0.0, "scale must be positive, got {scale}");
        Self {
            scale,
            ..Self::default()
        }
    }

    pub fn content(mut self, widget: WidgetRef) -> Self {
        self.child.slot.attach(widget);
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        assert!(scale.is_finite() && scale > 0.0, "scale must be positive, got {scale}");
        if self.scale != scale {
            self.scale = scale;
            self.base.invalidate();
        }
    }

    pub fn set_content(&mut self, widget: WidgetRef) -> WidgetRef {
        self.base.invalidate();
        self.child.slot.attach(widget)
    }
}

impl Widget for Scaler {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Scaler"
    }

    fn children(&self) -> &dyn Children {
        &self.child
    }

    fn relative_layout_scale(&self, _child_index: usize) -> f32 {
        self.scale
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        let child = self.child.widget().borrow();
        if child.visibility().is_collapsed() {
            return Size::ZERO;
        }
        child.desired_size() * self.scale
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        let local = Size::new(allotted.size.width / self.scale, allotted.size.height / self.scale);
        arranged.add_widget(
            self.child.widget().clone(),
            allotted.make_child(Point::ORIGIN, local, self.scale),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::context::{arrange_children_of, LayoutContext};
    use crate::visibility::VisibilityFilter;
    use crate::widget::WidgetExt;
    use crate::widgets::spacer::Spacer;

    #[test]
    fn desired_is_scaled() {
        let scaler = Scaler::new(2.0).content(Spacer::new(10.0, 5.0).into_ref()).into_ref();
        assert_eq!(LayoutContext::new().prepass(&scaler, 1.0), Size::new(20.0, 10.0));
    }

    #[test]
    fn child_receives_combined_layout_scale() {
        let leaf = Spacer::new(10.0, 5.0).into_ref();
        let scaler = Scaler::new(2.0).content(leaf.clone()).into_ref();
        LayoutContext::new().prepass(&scaler, 1.5);
        assert!(leaf.borrow().base().cache().is_valid_for(3.0));
    }

    #[test]
    fn child_arranged_in_scaled_space() {
        let leaf = Spacer::new(10.0, 5.0).into_ref();
        let scaler = Scaler::new(2.0).content(leaf.clone()).into_ref();
        LayoutContext::new().prepass(&scaler, 1.0);

        let root = Geometry::root(Size::new(100.0, 60.0), 1.0);
        let arranged = arrange_children_of(&scaler, &root, VisibilityFilter::LAYOUT);
        let geometry = arranged.find(&leaf).map(|a| a.geometry);

        assert_eq!(geometry.map(|g| g.size), Some(Size::new(50.0, 30.0)));
        assert_eq!(geometry.map(|g| g.scale()), Some(2.0));
        assert_eq!(geometry.map(|g| g.absolute_size()), Some(Size::new(100.0, 60.0)));
    }

    #[test]
    #[should_panic(expected = "scale must be positive")]
    fn zero_scale_rejected() {
        Scaler::new(0.0);
    }
}
