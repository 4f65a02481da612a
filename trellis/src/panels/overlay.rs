//! Overlay - children stacked in the same region.

use crate::geometry::Geometry;
use crate::layout::align::align_child;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{impl_slot_builders, Children, PanelChildren, PanelSlot, SlotBase};
use crate::primitives::{Orientation, Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

/// A child of an `Overlay`.
#[derive(Debug, Clone)]
pub struct OverlaySlot {
    base: SlotBase,
    z_order: i32,
}

impl_slot_builders!(OverlaySlot);

impl OverlaySlot {
    pub fn new(widget: WidgetRef) -> Self {
        Self {
            base: SlotBase::new(widget),
            z_order: 0,
        }
    }

    /// Paint order relative to siblings. Higher paints later.
    pub fn z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn z(&self) -> i32 {
        self.z_order
    }
}

/// Stacks every child over the whole allotted area.
#[derive(Default)]
pub struct Overlay {
    base: WidgetBase,
    children: PanelChildren<OverlaySlot>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(mut self, slot: OverlaySlot) -> Self {
        self.children.push(slot);
        self
    }

    pub fn add_slot(&mut self, slot: OverlaySlot) -> usize {
        self.children.push(slot);
        self.base.invalidate();
        self.children.len() - 1
    }

    pub fn insert_slot(&mut self, index: usize, slot: OverlaySlot) {
        self.children.insert(index, slot);
        self.base.invalidate();
    }

    pub fn remove_slot(&mut self, index: usize) -> OverlaySlot {
        self.base.invalidate();
        self.children.remove(index)
    }

    pub fn remove_widget(&mut self, widget: &WidgetRef) -> bool {
        self.base.invalidate();
        self.children.remove_widget(widget).is_some()
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
        self.base.invalidate();
    }

    pub fn num_slots(&self) -> usize {
        self.children.len()
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut OverlaySlot> {
        self.base.invalidate();
        self.children.get_mut(index)
    }

    pub fn set_z_order(&mut self, index: usize, z_order: i32) {
        if let Some(slot) = self.children.get_mut(index) {
            slot.z_order = z_order;
        }
    }
}

impl Widget for Overlay {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Overlay"
    }

    fn children(&self) -> &dyn Children {
        &self.children
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        self.children
            .iter()
            .filter_map(|slot| {
                let child = slot.widget().borrow();
                (!child.visibility().is_collapsed())
                    .then(|| child.desired_size() + slot.layout().padding.desired_size())
            })
            .fold(Size::ZERO, Size::max)
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        let mut order: Vec<&OverlaySlot> = self.children.iter().collect();
        order.sort_by_key(|slot| slot.z_order);

        for slot in order {
            let desired = slot.widget().borrow().desired_size();
            let layout = slot.layout();
            let x = align_child(Orientation::Horizontal, allotted.size.width, layout, desired);
            let y = align_child(Orientation::Vertical, allotted.size.height, layout, desired);
            arranged.add_widget(
                slot.widget().clone(),
                allotted.make_child(Point::new(x.offset, y.offset), Size::new(x.length, y.length), 1.0),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::context::{arrange_children_of, LayoutContext};
    use crate::layout::length::{Align, Padding};
    use crate::visibility::{Visibility, VisibilityFilter};
    use crate::widget::WidgetExt;
    use crate::widgets::spacer::Spacer;

    #[test]
    fn desired_is_max_of_padded_children() {
        let panel = Overlay::new()
            .slot(OverlaySlot::new(Spacer::new(30.0, 5.0).into_ref()).padding(Padding::all(5.0)))
            .slot(OverlaySlot::new(Spacer::new(10.0, 50.0).into_ref()))
            .slot(OverlaySlot::new(
                Spacer::new(500.0, 500.0)
                    .with_visibility(Visibility::Collapsed)
                    .into_ref(),
            ))
            .into_ref();

        assert_eq!(LayoutContext::new().prepass(&panel, 1.0), Size::new(40.0, 50.0));
    }

    #[test]
    fn arranges_in_ascending_z_order() {
        let low = Spacer::new(10.0, 10.0).into_ref();
        let high = Spacer::new(10.0, 10.0).into_ref();
        let mid = Spacer::new(10.0, 10.0).into_ref();
        let panel = Overlay::new()
            .slot(OverlaySlot::new(high.clone()).z_order(5))
            .slot(OverlaySlot::new(low.clone()).z_order(-1))
            .slot(OverlaySlot::new(mid.clone()))
            .into_ref();

        LayoutContext::new().prepass(&panel, 1.0);
        let arranged = arrange_children_of(
            &panel,
            &Geometry::root(Size::new(100.0, 100.0), 1.0),
            VisibilityFilter::LAYOUT,
        );

        let order: Vec<bool> = vec![
            arranged.get(0).is_some_and(|a| a.is(&low)),
            arranged.get(1).is_some_and(|a| a.is(&mid)),
            arranged.get(2).is_some_and(|a| a.is(&high)),
        ];
        assert_eq!(order, vec![true, true, true]);
    }

    #[test]
    fn each_child_aligned_in_full_area() {
        let panel = Overlay::new()
            .slot(
                OverlaySlot::new(Spacer::new(20.0, 10.0).into_ref())
                    .h_align(Align::End)
                    .v_align(Align::Center),
            )
            .into_ref();

        LayoutContext::new().prepass(&panel, 1.0);
        let arranged = arrange_children_of(
            &panel,
            &Geometry::root(Size::new(100.0, 50.0), 1.0),
            VisibilityFilter::LAYOUT,
        );
        let geometry = arranged.get(0).map(|a| a.geometry);
        assert_eq!(geometry.map(|g| g.position), Some(Point::new(80.0, 20.0)));
        assert_eq!(geometry.map(|g| g.size), Some(Size::new(20.0, 10.0)));
    }
}
