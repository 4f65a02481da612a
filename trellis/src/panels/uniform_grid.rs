//! UniformGridPanel - grid whose cells all share one size.
//!
//! The cell size is the largest padded desired size of any child, floored by
//! the panel's minimum slot width and height. Arrangement divides the
//! allotted area evenly between the columns and rows actually in use.

use crate::geometry::Geometry;
use crate::layout::align::align_child;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{impl_slot_builders, Children, PanelChildren, PanelSlot, SlotBase};
use crate::layout::length::Padding;
use crate::primitives::{Orientation, Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

/// A child of a `UniformGridPanel`.
#[derive(Debug, Clone)]
pub struct UniformGridSlot {
    base: SlotBase,
    column: usize,
    row: usize,
}

impl_slot_builders!(UniformGridSlot);

impl UniformGridSlot {
    pub fn new(widget: WidgetRef, column: usize, row: usize) -> Self {
        Self {
            base: SlotBase::new(widget),
            column,
            row,
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row(&self) -> usize {
        self.row
    }
}

/// A grid of equally sized cells.
#[derive(Default)]
pub struct UniformGridPanel {
    base: WidgetBase,
    children: PanelChildren<UniformGridSlot>,
    slot_padding: Padding,
    min_slot_width: f32,
    min_slot_height: f32,
}

impl UniformGridPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(mut self, slot: UniformGridSlot) -> Self {
        self.children.push(slot);
        self
    }

    /// Padding applied inside every cell.
    pub fn slot_padding(mut self, padding: Padding) -> Self {
        self.slot_padding = padding;
        self
    }

    pub fn min_desired_slot_width(mut self, width: f32) -> Self {
        self.min_slot_width = width;
        self
    }

    pub fn min_desired_slot_height(mut self, height: f32) -> Self {
        self.min_slot_height = height;
        self
    }

    pub fn set_slot_padding(&mut self, padding: Padding) {
        self.slot_padding = padding;
        self.base.invalidate();
    }

    pub fn add_slot(&mut self, slot: UniformGridSlot) -> usize {
        self.children.push(slot);
        self.base.invalidate();
        self.children.len() - 1
    }

    pub fn remove_slot(&mut self, index: usize) -> UniformGridSlot {
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

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut UniformGridSlot> {
        self.base.invalidate();
        self.children.get_mut(index)
    }

    /// Columns and rows spanned by the non-collapsed children.
    pub fn dimensions(&self) -> (usize, usize) {
        self.children
            .iter()
            .filter(|slot| !slot.widget().borrow().visibility().is_collapsed())
            .fold((0, 0), |(columns, rows), slot| {
                (columns.max(slot.column + 1), rows.max(slot.row + 1))
            })
    }
}

impl Widget for UniformGridPanel {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "UniformGrid"
    }

    fn children(&self) -> &dyn Children {
        &self.children
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        let (columns, rows) = self.dimensions();
        if columns == 0 || rows == 0 {
            return Size::ZERO;
        }

        let padding = self.slot_padding.desired_size();
        let cell = self
            .children
            .iter()
            .filter_map(|slot| {
                let child = slot.widget().borrow();
                (!child.visibility().is_collapsed()).then(|| child.desired_size() + padding)
            })
            .fold(Size::new(self.min_slot_width, self.min_slot_height), Size::max);

        Size::new(cell.width * columns as f32, cell.height * rows as f32)
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        let (columns, rows) = self.dimensions();
        if columns == 0 || rows == 0 {
            return;
        }

        let cell = Size::new(
            allotted.size.width / columns as f32,
            allotted.size.height / rows as f32,
        );

        for slot in self.children.iter() {
            let desired = slot.widget().borrow().desired_size();
            // The panel's padding replaces the per-slot padding.
            let mut layout = *slot.layout();
            layout.padding = self.slot_padding;

            let x = align_child(Orientation::Horizontal, cell.width, &layout, desired);
            let y = align_child(Orientation::Vertical, cell.height, &layout, desired);
            let offset = Point::new(
                cell.width * slot.column as f32 + x.offset,
                cell.height * slot.row as f32 + y.offset,
            );
            arranged.add_widget(
                slot.widget().clone(),
                allotted.make_child(offset, Size::new(x.length, y.length), 1.0),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::context::{arrange_children_of, LayoutContext};
    use crate::layout::length::Align;
    use crate::visibility::{Visibility, VisibilityFilter};
    use crate::widget::WidgetExt;
    use crate::widgets::spacer::Spacer;

    #[test]
    fn cells_take_largest_child() {
        let panel = UniformGridPanel::new()
            .slot_padding(Padding::all(1.0))
            .slot(UniformGridSlot::new(Spacer::new(30.0, 5.0).into_ref(), 0, 0))
            .slot(UniformGridSlot::new(Spacer::new(10.0, 20.0).into_ref(), 2, 1))
            .into_ref();

        // Cell is 32 x 22; the grid spans 3 columns and 2 rows.
        assert_eq!(LayoutContext::new().prepass(&panel, 1.0), Size::new(96.0, 44.0));
    }

    #[test]
    fn min_slot_size_floors_cells() {
        let panel = UniformGridPanel::new()
            .min_desired_slot_width(50.0)
            .min_desired_slot_height(8.0)
            .slot(UniformGridSlot::new(Spacer::new(10.0, 10.0).into_ref(), 1, 0))
            .into_ref();
        assert_eq!(LayoutContext::new().prepass(&panel, 1.0), Size::new(100.0, 10.0));
    }

    #[test]
    fn empty_grid_is_zero() {
        let hidden = Spacer::new(10.0, 10.0)
            .with_visibility(Visibility::Collapsed)
            .into_ref();
        let panel = UniformGridPanel::new()
            .min_desired_slot_width(50.0)
            .slot(UniformGridSlot::new(hidden, 3, 3))
            .into_ref();
        assert_eq!(LayoutContext::new().prepass(&panel, 1.0), Size::ZERO);

        let arranged = arrange_children_of(
            &panel,
            &Geometry::root(Size::new(100.0, 100.0), 1.0),
            VisibilityFilter::LAYOUT,
        );
        assert!(arranged.is_empty());
    }

    #[test]
    fn arrange_divides_evenly() {
        let a = Spacer::new(10.0, 10.0).into_ref();
        let b = Spacer::new(10.0, 10.0).into_ref();
        let panel = UniformGridPanel::new()
            .slot(UniformGridSlot::new(a.clone(), 0, 0))
            .slot(UniformGridSlot::new(b.clone(), 1, 1).h_align(Align::Start))
            .into_ref();

        LayoutContext::new().prepass(&panel, 1.0);
        let arranged = arrange_children_of(
            &panel,
            &Geometry::root(Size::new(200.0, 100.0), 1.0),
            VisibilityFilter::LAYOUT,
        );

        let ga = arranged.find(&a).map(|entry| entry.geometry);
        assert_eq!(ga.map(|g| g.size), Some(Size::new(100.0, 50.0)));

        let gb = arranged.find(&b).map(|entry| entry.geometry);
        assert_eq!(gb.map(|g| g.position), Some(Point::new(100.0, 50.0)));
        assert_eq!(gb.map(|g| g.size), Some(Size::new(10.0, 50.0)));
    }
}
