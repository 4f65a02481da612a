//! GridPanel - spanning grid layout.
//!
//! Slots sit at (column, row) and may span several columns and rows. Each
//! column and row has a fill coefficient: tracks with a nonzero coefficient
//! share the space left over by the others, tracks with zero keep their
//! desired size. Track sizes are turned into cumulative offsets so a slot
//! spanning `[c, c + span)` reads its extent as `offsets[c + span] - offsets[c]`.

use crate::geometry::Geometry;
use crate::layout::align::align_child;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{impl_slot_builders, Children, PanelChildren, PanelSlot, SlotBase};
use crate::layout::distribute::{distribute_stretch, partial_sums, StretchInput};
use crate::primitives::{Orientation, Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

// =========================================================================
// GridSlot
// =========================================================================

/// A child of a `GridPanel`.
#[derive(Debug, Clone)]
pub struct GridSlot {
    base: SlotBase,
    column: usize,
    row: usize,
    column_span: usize,
    row_span: usize,
    layer: i32,
    nudge: Point,
}

impl_slot_builders!(GridSlot);

impl GridSlot {
    /// A single-cell slot at (`column`, `row`).
    pub fn new(widget: WidgetRef, column: usize, row: usize) -> Self {
        Self {
            base: SlotBase::new(widget),
            column,
            row,
            column_span: 1,
            row_span: 1,
            layer: 0,
            nudge: Point::ORIGIN,
        }
    }

    /// Span `span` columns. Panics on zero.
    pub fn column_span(mut self, span: usize) -> Self {
        assert!(span > 0, "grid column span must be at least 1");
        self.column_span = span;
        self
    }

    /// Span `span` rows. Panics on zero.
    pub fn row_span(mut self, span: usize) -> Self {
        assert!(span > 0, "grid row span must be at least 1");
        self.row_span = span;
        self
    }

    /// Draw order; higher layers are arranged after lower ones.
    pub fn layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Extra offset added after alignment.
    pub fn nudge(mut self, nudge: Point) -> Self {
        self.nudge = nudge;
        self
    }

    pub fn set_nudge(&mut self, nudge: Point) {
        self.nudge = nudge;
    }

    /// Column index.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Row index.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn spans(&self) -> (usize, usize) {
        (self.column_span, self.row_span)
    }

    pub fn layer_index(&self) -> i32 {
        self.layer
    }

    /// Track index and span along an axis.
    fn track(&self, orientation: Orientation) -> (usize, usize) {
        match orientation {
            Orientation::Horizontal => (self.column, self.column_span),
            Orientation::Vertical => (self.row, self.row_span),
        }
    }
}

// =========================================================================
// GridPanel
// =========================================================================

/// A grid of cells whose children may span several columns and rows.
#[derive(Default)]
pub struct GridPanel {
    base: WidgetBase,
    children: PanelChildren<GridSlot>,
    column_fill: Vec<f32>,
    row_fill: Vec<f32>,
}

impl GridPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot.
    pub fn slot(mut self, slot: GridSlot) -> Self {
        self.add_slot(slot);
        self
    }

    /// Set the fill coefficient of a column.
    pub fn fill_column(mut self, column: usize, coefficient: f32) -> Self {
        self.set_column_fill(column, coefficient);
        self
    }

    /// Set the fill coefficient of a row.
    pub fn fill_row(mut self, row: usize, coefficient: f32) -> Self {
        self.set_row_fill(row, coefficient);
        self
    }

    pub fn set_column_fill(&mut self, column: usize, coefficient: f32) {
        set_fill(&mut self.column_fill, column, coefficient);
        self.base.invalidate();
    }

    pub fn set_row_fill(&mut self, row: usize, coefficient: f32) {
        set_fill(&mut self.row_fill, row, coefficient);
        self.base.invalidate();
    }

    pub fn clear_fill(&mut self) {
        self.column_fill.clear();
        self.row_fill.clear();
        self.base.invalidate();
    }

    /// Insert a slot after every slot on the same or a lower layer.
    /// Returns its index.
    pub fn add_slot(&mut self, slot: GridSlot) -> usize {
        let index = self
            .children
            .iter()
            .position(|existing| existing.layer > slot.layer)
            .unwrap_or(self.children.len());
        self.children.insert(index, slot);
        self.base.invalidate();
        index
    }

    pub fn remove_slot(&mut self, index: usize) -> GridSlot {
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

    pub fn slot_at(&self, index: usize) -> Option<&GridSlot> {
        self.children.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut GridSlot> {
        self.base.invalidate();
        self.children.get_mut(index)
    }

    /// Move a slot to another layer, keeping slots ordered by layer.
    pub fn set_slot_layer(&mut self, index: usize, layer: i32) {
        if let Some(slot) = self.children.get_mut(index) {
            slot.layer = layer;
            self.children.sort_by_key(|slot| slot.layer);
            self.base.invalidate();
        }
    }

    /// Move a slot to another cell.
    pub fn set_slot_cell(&mut self, index: usize, column: usize, row: usize) {
        if let Some(slot) = self.children.get_mut(index) {
            slot.column = column;
            slot.row = row;
            self.base.invalidate();
        }
    }

    /// Number of columns and rows.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.track_count(Orientation::Horizontal), self.track_count(Orientation::Vertical))
    }

    fn fill(&self, orientation: Orientation) -> &[f32] {
        match orientation {
            Orientation::Horizontal => &self.column_fill,
            Orientation::Vertical => &self.row_fill,
        }
    }

    fn track_count(&self, orientation: Orientation) -> usize {
        self.children
            .iter()
            .map(|slot| {
                let (start, span) = slot.track(orientation);
                start + span
            })
            .max()
            .unwrap_or(0)
            .max(self.fill(orientation).len())
    }

    /// Desired size of every track along `orientation`.
    ///
    /// A slot's contribution (desired + padding) is split evenly over the
    /// tracks it spans and each track keeps the largest contribution it sees.
    pub fn desired_track_sizes(&self, orientation: Orientation) -> Vec<f32> {
        let mut tracks = vec![0.0f32; self.track_count(orientation)];
        for slot in self.children.iter() {
            let child = slot.widget().borrow();
            if child.visibility().is_collapsed() {
                continue;
            }
            let (start, span) = slot.track(orientation);
            let contribution = child.desired_size().along(orientation) + slot.layout().padding.along(orientation);
            let per_cell = contribution / span as f32;
            for track in &mut tracks[start..start + span] {
                *track = track.max(per_cell);
            }
        }
        tracks
    }

    /// Final track sizes for `available` along `orientation`.
    pub fn track_sizes(&self, orientation: Orientation, available: f32) -> Vec<f32> {
        let desired = self.desired_track_sizes(orientation);
        let fill = self.fill(orientation);
        let inputs = desired.iter().enumerate().map(|(index, size)| {
            match fill.get(index).copied().unwrap_or(0.0) {
                coefficient if coefficient > 0.0 => StretchInput::Stretch(coefficient),
                _ => StretchInput::Fixed(*size),
            }
        });
        let (allocations, _) = distribute_stretch(inputs, available, 0.0);
        allocations.into_iter().map(|a| a.size).collect()
    }

    /// Cumulative track offsets for `available` along `orientation`. The
    /// result has one more entry than there are tracks.
    pub fn track_offsets(&self, orientation: Orientation, available: f32) -> Vec<f32> {
        partial_sums(&self.track_sizes(orientation, available))
    }
}

fn set_fill(fill: &mut Vec<f32>, index: usize, coefficient: f32) {
    if fill.len() <= index {
        fill.resize(index + 1, 0.0);
    }
    fill[index] = coefficient.max(0.0);
}

impl Widget for GridPanel {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "GridPanel"
    }

    fn children(&self) -> &dyn Children {
        &self.children
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        let width: f32 = self.desired_track_sizes(Orientation::Horizontal).iter().sum();
        let height: f32 = self.desired_track_sizes(Orientation::Vertical).iter().sum();
        Size::new(width, height)
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        if self.children.is_empty() {
            return;
        }
        let columns = self.track_offsets(Orientation::Horizontal, allotted.size.width);
        let rows = self.track_offsets(Orientation::Vertical, allotted.size.height);

        for slot in self.children.iter() {
            let desired = {
                let child = slot.widget().borrow();
                if child.visibility().is_collapsed() {
                    continue;
                }
                child.desired_size()
            };

            let cell_offset = Point::new(columns[slot.column], rows[slot.row]);
            let cell_size = Size::new(
                columns[slot.column + slot.column_span] - columns[slot.column],
                rows[slot.row + slot.row_span] - rows[slot.row],
            );

            let layout = slot.layout();
            let x = align_child(Orientation::Horizontal, cell_size.width, layout, desired);
            let y = align_child(Orientation::Vertical, cell_size.height, layout, desired);

            let offset = cell_offset + Point::new(x.offset, y.offset) + slot.nudge;
            arranged.add_widget(
                slot.widget().clone(),
                allotted.make_child(offset, Size::new(x.length, y.length), 1.0),
            );
        }
    }
}
