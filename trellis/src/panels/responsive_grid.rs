//! ResponsiveGridPanel - breakpoint-driven column grid.
//!
//! The panel has a fixed number of columns. Each slot lists layouts keyed by
//! a minimum panel width; when arranging at width `w` the slot uses the
//! layout with the largest minimum still `<= w` (a full-width span when none
//! applies). Slots are packed into rows greedily, and rows are sized with
//! the same auto/stretch distribution as a vertical box.

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::layout::align::align_child;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{impl_slot_builders, Children, PanelChildren, PanelSlot, SlotBase};
use crate::layout::distribute::{distribute_stretch, StretchInput};
use crate::primitives::{Orientation, Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

pub const DEFAULT_TOTAL_COLUMNS: usize = 12;

/// Column span and offset used at or above a panel width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveLayout {
    pub min_width: f32,
    pub span: usize,
    #[serde(default)]
    pub offset: usize,
}

impl ResponsiveLayout {
    pub fn new(min_width: f32, span: usize, offset: usize) -> Self {
        Self { min_width, span, offset }
    }
}

// =========================================================================
// ResponsiveSlot
// =========================================================================

/// A child of a `ResponsiveGridPanel`.
#[derive(Debug, Clone)]
pub struct ResponsiveSlot {
    base: SlotBase,
    layouts: Vec<ResponsiveLayout>,
}

impl_slot_builders!(ResponsiveSlot);

impl ResponsiveSlot {
    pub fn new(widget: WidgetRef) -> Self {
        Self {
            base: SlotBase::new(widget),
            layouts: Vec::new(),
        }
    }

    /// Use `span` columns after skipping `offset` from `min_width` upward.
    pub fn breakpoint(mut self, min_width: f32, span: usize, offset: usize) -> Self {
        self.add_layout(ResponsiveLayout::new(min_width, span, offset));
        self
    }

    /// Insert a layout keeping them ordered by `min_width`.
    pub fn add_layout(&mut self, layout: ResponsiveLayout) {
        let index = self
            .layouts
            .iter()
            .position(|existing| existing.min_width > layout.min_width)
            .unwrap_or(self.layouts.len());
        self.layouts.insert(index, layout);
    }

    pub fn layouts(&self) -> &[ResponsiveLayout] {
        &self.layouts
    }

    /// The (span, offset) in effect at `width`.
    pub fn layout_for_width(&self, width: f32, total_columns: usize) -> (usize, usize) {
        self.layouts
            .iter()
            .rev()
            .find(|layout| layout.min_width <= width)
            .map(|layout| (layout.span, layout.offset))
            .unwrap_or((total_columns, 0))
    }
}

/// A slot assigned to a row and a column range.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PackedSlot {
    index: usize,
    column: usize,
    span: usize,
}

// =========================================================================
// ResponsiveGridPanel
// =========================================================================

/// A grid whose slots change span with the panel width.
pub struct ResponsiveGridPanel {
    base: WidgetBase,
    children: PanelChildren<ResponsiveSlot>,
    total_columns: usize,
    column_gutter: f32,
    row_gutter: f32,
    row_fill: Vec<f32>,
    measure_width: f32,
}

impl Default for ResponsiveGridPanel {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_COLUMNS)
    }
}

impl ResponsiveGridPanel {
    /// Panics when `total_columns` is zero.
    pub fn new(total_columns: usize) -> Self {
        assert!(total_columns > 0, "responsive grid needs at least one column");
        Self {
            base: WidgetBase::new(),
            children: PanelChildren::new(),
            total_columns,
            column_gutter: 0.0,
            row_gutter: 0.0,
            row_fill: Vec::new(),
            measure_width: f32::INFINITY,
        }
    }

    /// Add a slot.
    pub fn slot(mut self, slot: ResponsiveSlot) -> Self {
        self.children.push(slot);
        self
    }

    /// Set the horizontal gap between columns.
    pub fn column_gutter(mut self, gutter: f32) -> Self {
        self.column_gutter = gutter.max(0.0);
        self
    }

    /// Set the vertical gap between rows.
    pub fn row_gutter(mut self, gutter: f32) -> Self {
        self.row_gutter = gutter.max(0.0);
        self
    }

    /// Set the fill coefficient of a row.
    pub fn fill_row(mut self, row: usize, coefficient: f32) -> Self {
        self.set_row_fill(row, coefficient);
        self
    }

    /// Set the width at which the desired size is computed.
    pub fn measure_width(mut self, width: f32) -> Self {
        self.measure_width = width;
        self
    }

    pub fn total_columns(&self) -> usize {
        self.total_columns
    }

    pub fn set_row_fill(&mut self, row: usize, coefficient: f32) {
        if self.row_fill.len() <= row {
            self.row_fill.resize(row + 1, 0.0);
        }
        self.row_fill[row] = coefficient.max(0.0);
        self.base.invalidate();
    }

    pub fn set_measure_width(&mut self, width: f32) {
        self.measure_width = width;
        self.base.invalidate();
    }

    pub fn add_slot(&mut self, slot: ResponsiveSlot) -> usize {
        self.children.push(slot);
        self.base.invalidate();
        self.children.len() - 1
    }

    pub fn insert_slot(&mut self, index: usize, slot: ResponsiveSlot) {
        self.children.insert(index, slot);
        self.base.invalidate();
    }

    pub fn remove_slot(&mut self, index: usize) -> ResponsiveSlot {
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

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut ResponsiveSlot> {
        self.base.invalidate();
        self.children.get_mut(index)
    }

    /// Greedily pack slots into rows for a panel `width`.
    fn pack_rows(&self, width: f32) -> Vec<Vec<PackedSlot>> {
        let total = self.total_columns;
        let mut rows: Vec<Vec<PackedSlot>> = Vec::new();
        let mut current: Vec<PackedSlot> = Vec::new();
        let mut next_column = 0usize;

        for (index, slot) in self.children.iter().enumerate() {
            if slot.widget().borrow().visibility().is_collapsed() {
                continue;
            }
            let (span, offset) = slot.layout_for_width(width, total);
            if span == 0 {
                continue;
            }
            let span = span.min(total);
            let offset = offset.min(total - span);

            if !current.is_empty() && next_column + offset + span > total {
                rows.push(std::mem::take(&mut current));
                next_column = 0;
            }

            let column = (next_column + offset).min(total - span);
            current.push(PackedSlot { index, column, span });
            next_column = column + span;
        }

        if !current.is_empty() {
            rows.push(current);
        }
        rows
    }

    /// Desired height of each packed row.
    fn row_heights(&self, rows: &[Vec<PackedSlot>]) -> Vec<f32> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|packed| {
                        let slot = &self.children[packed.index];
                        slot.widget().borrow().desired_size().height + slot.layout().padding.vertical()
                    })
                    .fold(0.0f32, f32::max)
            })
            .collect()
    }

    fn gutters(&self, rows: usize) -> f32 {
        rows.saturating_sub(1) as f32 * self.row_gutter
    }
}

impl Widget for ResponsiveGridPanel {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "ResponsiveGridPanel"
    }

    fn children(&self) -> &dyn Children {
        &self.children
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        let rows = self.pack_rows(self.measure_width);
        let total = self.total_columns as f32;
        let gutter = self.column_gutter;

        // Widest panel any slot needs for its span to fit its content.
        let width = rows
            .iter()
            .flatten()
            .map(|packed| {
                let slot = &self.children[packed.index];
                let desired = slot.widget().borrow().desired_size().width + slot.layout().padding.horizontal();
                (total * (desired + gutter) / packed.span as f32 - gutter).max(0.0)
            })
            .fold(0.0f32, f32::max);

        let height = self.row_heights(&rows).iter().sum::<f32>() + self.gutters(rows.len());
        Size::new(width, height)
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        let width = allotted.size.width;
        let rows = self.pack_rows(width);
        if rows.is_empty() {
            return;
        }

        let column_width = (width + self.column_gutter) / self.total_columns as f32;
        let heights = self.row_heights(&rows);
        let inputs = heights.iter().enumerate().map(|(row, height)| {
            match self.row_fill.get(row).copied().unwrap_or(0.0) {
                coefficient if coefficient > 0.0 => StretchInput::Stretch(coefficient),
                _ => StretchInput::Fixed(*height),
            }
        });
        let (allocations, _) = distribute_stretch(inputs, allotted.size.height, self.gutters(rows.len()));

        let mut y = 0.0f32;
        for (row, allocation) in rows.iter().zip(allocations) {
            for packed in row {
                let slot = &self.children[packed.index];
                let desired = slot.widget().borrow().desired_size();
                let cell_x = packed.column as f32 * column_width;
                let cell_width = (packed.span as f32 * column_width - self.column_gutter).max(0.0);

                let layout = slot.layout();
                let h = align_child(Orientation::Horizontal, cell_width, layout, desired);
                let v = align_child(Orientation::Vertical, allocation.size, layout, desired);
                arranged.add_widget(
                    slot.widget().clone(),
                    allotted.make_child(
                        Point::new(cell_x + h.offset, y + v.offset),
                        Size::new(h.length, v.length),
                        1.0,
                    ),
                );
            }
            y += allocation.size + self.row_gutter;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::context::LayoutContext;
    use crate::visibility::{Visibility, VisibilityFilter};
    use crate::widget::WidgetExt;
    use crate::widgets::spacer::Spacer;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    fn leaf(width: f32, height: f32) -> WidgetRef {
        Spacer::new(width, height).into_ref()
    }

    fn arrange(panel: &WidgetRef, size: Size) -> ArrangedChildren {
        LayoutContext::new().prepass(panel, 1.0);
        let mut arranged = ArrangedChildren::new(VisibilityFilter::LAYOUT);
        panel
            .borrow()
            .arrange_children(&Geometry::root(size, 1.0), &mut arranged);
        arranged
    }

    #[test]
    fn test_layout_selection_by_width() {
        let slot = ResponsiveSlot::new(leaf(1.0, 1.0))
            .breakpoint(800.0, 4, 0)
            .breakpoint(0.0, 12, 0)
            .breakpoint(400.0, 6, 1);

        assert_eq!(slot.layout_for_width(100.0, 12), (12, 0));
        assert_eq!(slot.layout_for_width(400.0, 12), (6, 1));
        assert_eq!(slot.layout_for_width(1000.0, 12), (4, 0));
        assert_eq!(ResponsiveSlot::new(leaf(1.0, 1.0)).layout_for_width(500.0, 12), (12, 0));
    }

    #[test]
    fn test_wide_layout_packs_side_by_side() {
        let (a, b) = (leaf(10.0, 20.0), leaf(10.0, 30.0));
        let panel = ResponsiveGridPanel::new(12)
            .slot(ResponsiveSlot::new(a.clone()).breakpoint(600.0, 6, 0))
            .slot(ResponsiveSlot::new(b.clone()).breakpoint(600.0, 6, 0))
            .into_ref();

        let wide = arrange(&panel, Size::new(1200.0, 500.0));
        let ga = wide.find(&a).map(|x| x.geometry);
        let gb = wide.find(&b).map(|x| x.geometry);
        assert_eq!(ga.map(|g| (g.position.x, g.size.width)), Some((0.0, 600.0)));
        assert_eq!(gb.map(|g| (g.position.x, g.position.y)), Some((600.0, 0.0)));
        // Both in one row, sized to the taller child.
        assert_eq!(gb.map(|g| g.size.height), Some(30.0));

        let narrow = arrange(&panel, Size::new(500.0, 500.0));
        let gb = narrow.find(&b).map(|x| x.geometry).expect("b arranged");
        assert_eq!((gb.position.x, gb.position.y), (0.0, 20.0));
        assert!(approx(gb.size.width, 500.0));
    }

    #[test]
    fn test_gutter_between_columns() {
        let (a, b) = (leaf(1.0, 10.0), leaf(1.0, 10.0));
        let panel = ResponsiveGridPanel::new(2)
            .column_gutter(10.0)
            .slot(ResponsiveSlot::new(a.clone()).breakpoint(0.0, 1, 0))
            .slot(ResponsiveSlot::new(b.clone()).breakpoint(0.0, 1, 0))
            .into_ref();

        let arranged = arrange(&panel, Size::new(210.0, 10.0));
        let ga = arranged.find(&a).map(|x| x.geometry).expect("a arranged");
        let gb = arranged.find(&b).map(|x| x.geometry).expect("b arranged");
        assert!(approx(ga.size.width, 100.0));
        assert!(approx(gb.position.x, 110.0));
        assert!(approx(gb.position.x + gb.size.width, 210.0));
    }

    #[test]
    fn test_offset_and_zero_span() {
        let (a, skipped) = (leaf(1.0, 10.0), leaf(1.0, 10.0));
        let panel = ResponsiveGridPanel::new(4)
            .slot(ResponsiveSlot::new(a.clone()).breakpoint(0.0, 2, 1))
            .slot(ResponsiveSlot::new(skipped.clone()).breakpoint(0.0, 0, 0))
            .into_ref();

        let arranged = arrange(&panel, Size::new(400.0, 100.0));
        assert_eq!(arranged.len(), 1);
        assert!(arranged.find(&skipped).is_none());
        assert_eq!(arranged.find(&a).map(|x| x.geometry.position.x), Some(100.0));
    }

    #[test]
    fn test_row_fill_and_gutter() {
        let (a, b) = (leaf(1.0, 10.0), leaf(1.0, 10.0));
        let panel = ResponsiveGridPanel::new(1)
            .row_gutter(5.0)
            .fill_row(1, 1.0)
            .slot(ResponsiveSlot::new(a))
            .slot(ResponsiveSlot::new(b.clone()))
            .into_ref();

        let arranged = arrange(&panel, Size::new(100.0, 100.0));
        let gb = arranged.find(&b).map(|x| x.geometry);
        assert_eq!(gb.map(|g| g.position.y), Some(15.0));
        assert_eq!(gb.map(|g| g.size.height), Some(85.0));
    }

    #[test]
    fn test_desired_size_at_measure_width() {
        let panel = ResponsiveGridPanel::new(4)
            .row_gutter(2.0)
            .slot(ResponsiveSlot::new(leaf(50.0, 10.0)).breakpoint(0.0, 2, 0))
            .slot(ResponsiveSlot::new(leaf(30.0, 10.0)).breakpoint(0.0, 2, 0))
            .slot(ResponsiveSlot::new(leaf(10.0, 20.0)).breakpoint(0.0, 4, 0))
            .into_ref();

        // 50 across 2 of 4 columns needs a 100 wide panel.
        let size = LayoutContext::new().prepass(&panel, 1.0);
        assert_eq!(size, Size::new(100.0, 10.0 + 2.0 + 20.0));
    }

    #[test]
    fn test_collapsed_slot_skipped() {
        let collapsed = Spacer::new(100.0, 100.0)
            .with_visibility(Visibility::Collapsed)
            .into_ref();
        let panel = ResponsiveGridPanel::new(2)
            .slot(ResponsiveSlot::new(collapsed.clone()))
            .slot(ResponsiveSlot::new(leaf(10.0, 10.0)).breakpoint(0.0, 1, 0))
            .into_ref();

        let size = LayoutContext::new().prepass(&panel, 1.0);
        assert_eq!(size, Size::new(20.0, 10.0));
        let arranged = arrange(&panel, Size::new(100.0, 100.0));
        assert_eq!(arranged.len(), 1);
        assert!(arranged.find(&collapsed).is_none());
    }

    #[test]
    #[should_panic]
    fn test_zero_columns_panics() {
        let _ = ResponsiveGridPanel::new(0);
    }
}
