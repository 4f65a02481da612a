//! BoxPanel - linear layout container.
//!
//! Children are stacked along one axis. Each slot is either auto-sized (its
//! desired length, optionally clamped by `max_size`) or stretched (a share of
//! the space left after auto slots and all margins, weighted by its
//! coefficient). On the cross axis every child is aligned within the full
//! allotted extent.

use crate::geometry::Geometry;
use crate::layout::align::{align_axis, align_child};
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{impl_slot_builders, Children, PanelChildren, PanelSlot, SlotBase};
use crate::layout::distribute::{distribute_stretch, StretchInput};
use crate::layout::length::SizeParam;
use crate::primitives::{Orientation, Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

// =========================================================================
// BoxSlot
// =========================================================================

/// A child of a `BoxPanel`.
#[derive(Debug, Clone)]
pub struct BoxSlot {
    base: SlotBase,
    size: SizeParam,
    max_size: Option<f32>,
}

impl_slot_builders!(BoxSlot);

impl BoxSlot {
    /// A stretch slot with coefficient 1.
    pub fn new(widget: WidgetRef) -> Self {
        Self {
            base: SlotBase::new(widget),
            size: SizeParam::default(),
            max_size: None,
        }
    }

    /// Size to the child's desired length.
    pub fn auto_size(mut self) -> Self {
        self.size = SizeParam::Auto;
        self
    }

    /// Take a share of the free space weighted by `coefficient`.
    pub fn stretch(mut self, coefficient: f32) -> Self {
        debug_assert!(coefficient >= 0.0, "negative stretch coefficient");
        self.size = SizeParam::Stretch(coefficient.max(0.0));
        self
    }

    /// Set the sizing rule directly.
    pub fn size_param(mut self, size: SizeParam) -> Self {
        self.size = size;
        self
    }

    /// Clamp the slot's main-axis length. Applies to stretch slots too.
    pub fn max_size(mut self, max_size: f32) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn size(&self) -> SizeParam {
        self.size
    }

    pub fn max(&self) -> Option<f32> {
        self.max_size
    }

    /// Apply the slot's max size to a main-axis length.
    #[inline]
    fn clamp(&self, length: f32) -> f32 {
        match self.max_size {
            Some(max) if max > 0.0 => length.min(max),
            _ => length,
        }
    }
}

// =========================================================================
// BoxPanel
// =========================================================================

/// A linear layout container.
pub struct BoxPanel {
    base: WidgetBase,
    orientation: Orientation,
    children: PanelChildren<BoxSlot>,
}

impl BoxPanel {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            base: WidgetBase::new(),
            orientation,
            children: PanelChildren::new(),
        }
    }

    /// Children flow left to right.
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// Children flow top to bottom.
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// Add a slot.
    pub fn slot(mut self, slot: BoxSlot) -> Self {
        self.children.push(slot);
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.base.invalidate();
    }

    /// Append a slot, returning its index.
    pub fn add_slot(&mut self, slot: BoxSlot) -> usize {
        self.children.push(slot);
        self.base.invalidate();
        self.children.len() - 1
    }

    pub fn insert_slot(&mut self, index: usize, slot: BoxSlot) {
        self.children.insert(index, slot);
        self.base.invalidate();
    }

    pub fn remove_slot(&mut self, index: usize) -> BoxSlot {
        self.base.invalidate();
        self.children.remove(index)
    }

    /// Remove the slot holding `widget`. Returns whether one was found.
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

    pub fn slot_at(&self, index: usize) -> Option<&BoxSlot> {
        self.children.get(index)
    }

    /// Mutable access to a slot's attributes.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut BoxSlot> {
        self.base.invalidate();
        self.children.get_mut(index)
    }
}

impl Widget for BoxPanel {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        match self.orientation {
            Orientation::Horizontal => "HorizontalBox",
            Orientation::Vertical => "VerticalBox",
        }
    }

    fn children(&self) -> &dyn Children {
        &self.children
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        let main = self.orientation;
        let cross = main.cross();
        let mut along = 0.0f32;
        let mut across = 0.0f32;

        for slot in self.children.iter() {
            let child = slot.widget().borrow();
            if child.visibility().is_collapsed() {
                continue;
            }
            let desired = child.desired_size();
            let padding = slot.layout().padding;
            along += slot.clamp(desired.along(main)) + padding.along(main);
            across = across.max(desired.along(cross) + padding.along(cross));
        }

        Size::from_axes(main, along, across)
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        if self.children.is_empty() {
            return;
        }
        let main = self.orientation;
        let cross = main.cross();

        // Collapsed slots take part in neither the totals nor the placement.
        let visible: Vec<(&BoxSlot, Size)> = self
            .children
            .iter()
            .filter_map(|slot| {
                let child = slot.widget().borrow();
                (!child.visibility().is_collapsed()).then(|| (slot, child.desired_size()))
            })
            .collect();

        let margins: f32 = visible.iter().map(|(slot, _)| slot.layout().padding.along(main)).sum();
        let inputs = visible.iter().map(|(slot, desired)| match slot.size {
            SizeParam::Auto => StretchInput::Fixed(slot.clamp(desired.along(main))),
            SizeParam::Stretch(coefficient) => StretchInput::Stretch(coefficient),
        });
        let (allocations, _) = distribute_stretch(inputs, allotted.size.along(main), margins);

        let mut position = 0.0f32;
        for ((slot, desired), allocation) in visible.iter().zip(allocations) {
            let layout = slot.layout();
            let child_size = slot.clamp(allocation.size);
            let slot_length = child_size + layout.padding.along(main);

            let main_placement = align_axis(
                slot_length,
                desired.along(main),
                layout.align(main),
                layout.padding.leading(main),
                layout.padding.trailing(main),
                true,
            );
            let cross_placement = align_child(cross, allotted.size.along(cross), layout, *desired);

            let offset = Point::from_axes(main, position + main_placement.offset, cross_placement.offset);
            let size = Size::from_axes(main, main_placement.length, cross_placement.length);
            arranged.add_widget(slot.widget().clone(), allotted.make_child(offset, size, 1.0));

            position += slot_length;
        }
    }
}
