//! WrapBox - line-wrapping layout container.
//!
//! Children are packed left to right up to a preferred width and wrap to a
//! new line when the next child would run past it. Lines stack top to
//! bottom. Per-slot policies can force a line break, stretch a child over
//! the rest of its line, or give a child a whole line below a width
//! threshold.
//!
//! Desired size and arrangement share one placement routine, so the
//! reported size is always the bounding box of what arrangement produces at
//! the preferred width.

use crate::geometry::Geometry;
use crate::layout::align::align_child;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{impl_slot_builders, Children, PanelChildren, PanelSlot, SlotBase};
use crate::primitives::{Orientation, Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

/// Default preferred width.
pub const DEFAULT_PREFERRED_WIDTH: f32 = 100.0;

// =========================================================================
// WrapSlot
// =========================================================================

/// A child of a `WrapBox`.
#[derive(Debug, Clone)]
pub struct WrapSlot {
    base: SlotBase,
    fill_empty_space: bool,
    fill_line_when_width_less_than: Option<f32>,
    force_new_line: bool,
}

impl_slot_builders!(WrapSlot);

impl WrapSlot {
    pub fn new(widget: WidgetRef) -> Self {
        Self {
            base: SlotBase::new(widget),
            fill_empty_space: false,
            fill_line_when_width_less_than: None,
            force_new_line: false,
        }
    }

    /// When this is the last child on its line, stretch it to the end of the
    /// line.
    pub fn fill_empty_space(mut self, fill: bool) -> Self {
        self.fill_empty_space = fill;
        self
    }

    /// When the wrap width is below `threshold`, give this child a line of
    /// its own, stretched to the full width.
    pub fn fill_line_when_width_less_than(mut self, threshold: f32) -> Self {
        self.fill_line_when_width_less_than = Some(threshold);
        self
    }

    /// Always start a new line before this child.
    pub fn force_new_line(mut self, force: bool) -> Self {
        self.force_new_line = force;
        self
    }

    pub fn fills_empty_space(&self) -> bool {
        self.fill_empty_space
    }

    pub fn forces_new_line(&self) -> bool {
        self.force_new_line
    }

    fn fills_line_at(&self, width: f32) -> bool {
        self.fill_line_when_width_less_than
            .is_some_and(|threshold| width < threshold)
    }
}

/// Where one slot landed, before alignment within the slot.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlotPlacement {
    index: usize,
    offset: Point,
    size: Size,
}

// =========================================================================
// WrapBox
// =========================================================================

/// A container that wraps its children onto multiple lines.
pub struct WrapBox {
    base: WidgetBase,
    children: PanelChildren<WrapSlot>,
    preferred_width: f32,
    inner_slot_padding: Size,
    use_allotted_width: bool,
}

impl Default for WrapBox {
    fn default() -> Self {
        Self::new()
    }
}

impl WrapBox {
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            children: PanelChildren::new(),
            preferred_width: DEFAULT_PREFERRED_WIDTH,
            inner_slot_padding: Size::ZERO,
            use_allotted_width: false,
        }
    }

    /// Add a slot.
    pub fn slot(mut self, slot: WrapSlot) -> Self {
        self.children.push(slot);
        self
    }

    /// Set the width at which lines wrap.
    pub fn preferred_width(mut self, width: f32) -> Self {
        self.preferred_width = width;
        self
    }

    /// Set the gap between slots (width) and between lines (height).
    pub fn inner_slot_padding(mut self, padding: Size) -> Self {
        self.inner_slot_padding = padding;
        self
    }

    /// Wrap at the allotted width instead of the preferred width when
    /// arranging.
    pub fn use_allotted_width(mut self, enabled: bool) -> Self {
        self.use_allotted_width = enabled;
        self
    }

    pub fn set_preferred_width(&mut self, width: f32) {
        self.preferred_width = width;
        self.base.invalidate();
    }

    pub fn set_inner_slot_padding(&mut self, padding: Size) {
        self.inner_slot_padding = padding;
        self.base.invalidate();
    }

    pub fn set_use_allotted_width(&mut self, enabled: bool) {
        self.use_allotted_width = enabled;
        self.base.invalidate();
    }

    pub fn add_slot(&mut self, slot: WrapSlot) -> usize {
        self.children.push(slot);
        self.base.invalidate();
        self.children.len() - 1
    }

    pub fn insert_slot(&mut self, index: usize, slot: WrapSlot) {
        self.children.insert(index, slot);
        self.base.invalidate();
    }

    pub fn remove_slot(&mut self, index: usize) -> WrapSlot {
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

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut WrapSlot> {
        self.base.invalidate();
        self.children.get_mut(index)
    }

    /// Place every non-collapsed slot for a wrap width of `width`.
    fn place_slots(&self, width: f32) -> Vec<SlotPlacement> {
        let mut placed = Vec::with_capacity(self.children.len());
        let mut line: Vec<SlotPlacement> = Vec::new();
        let mut cursor = Point::ORIGIN;
        let mut line_height = 0.0f32;

        // Emits the current line and moves the cursor to the start of the next.
        let mut finalize_line = |line: &mut Vec<SlotPlacement>, cursor: &mut Point, line_height: &mut f32| {
            if let Some(last) = line.last_mut() {
                if self.children[last.index].fill_empty_space {
                    last.size.width = width - last.offset.x;
                }
            }
            placed.append(line);
            cursor.x = 0.0;
            cursor.y += *line_height + self.inner_slot_padding.height;
            *line_height = 0.0;
        };

        for (index, slot) in self.children.iter().enumerate() {
            let desired = {
                let child = slot.widget().borrow();
                if child.visibility().is_collapsed() {
                    continue;
                }
                child.desired_size()
            };

            let first_in_line = line.is_empty();
            let mut placement = SlotPlacement {
                index,
                offset: cursor,
                size: desired + slot.layout().padding.desired_size(),
            };

            let fill_line = slot.fills_line_at(width);
            let overflows = placement.offset.x + placement.size.width > width;
            if !first_in_line && (fill_line || overflows || slot.force_new_line) {
                finalize_line(&mut line, &mut cursor, &mut line_height);
                placement.offset = cursor;
            }

            cursor.x = placement.offset.x + placement.size.width + self.inner_slot_padding.width;
            line_height = line_height.max(placement.size.height);

            if fill_line {
                placement.size.width = width - placement.offset.x;
                line.push(placement);
                finalize_line(&mut line, &mut cursor, &mut line_height);
            } else {
                line.push(placement);
            }
        }

        if !line.is_empty() {
            finalize_line(&mut line, &mut cursor, &mut line_height);
        }
        placed
    }
}

impl Widget for WrapBox {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "WrapBox"
    }

    fn children(&self) -> &dyn Children {
        &self.children
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        self.place_slots(self.preferred_width)
            .iter()
            .fold(Size::ZERO, |extent, placement| {
                extent.max(Size::new(
                    placement.offset.x + placement.size.width,
                    placement.offset.y + placement.size.height,
                ))
            })
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        let width = if self.use_allotted_width {
            allotted.size.width
        } else {
            self.preferred_width
        };

        for placement in self.place_slots(width) {
            let slot = &self.children[placement.index];
            let desired = slot.widget().borrow().desired_size();
            let layout = slot.layout();
            let x = align_child(Orientation::Horizontal, placement.size.width, layout, desired);
            let y = align_child(Orientation::Vertical, placement.size.height, layout, desired);

            arranged.add_widget(
                slot.widget().clone(),
                allotted.make_child(
                    placement.offset + Point::new(x.offset, y.offset),
                    Size::new(x.length, y.length),
                    1.0,
                ),
            );
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

    fn leaf(width: f32, height: f32) -> WidgetRef {
        Spacer::new(width, height).into_ref()
    }

    fn arrange(panel: &WidgetRef, size: Size) -> Vec<(Point, Size)> {
        LayoutContext::new().prepass(panel, 1.0);
        let mut arranged = ArrangedChildren::new(VisibilityFilter::LAYOUT);
        panel
            .borrow()
            .arrange_children(&Geometry::root(size, 1.0), &mut arranged);
        arranged
            .iter()
            .map(|a| (a.geometry.position, a.geometry.size))
            .collect()
    }

    #[test]
    fn test_wraps_when_line_is_full() {
        let panel = WrapBox::new()
            .preferred_width(100.0)
            .slot(WrapSlot::new(leaf(40.0, 10.0)))
            .slot(WrapSlot::new(leaf(40.0, 20.0)))
            .slot(WrapSlot::new(leaf(40.0, 10.0)))
            .into_ref();

        let placed = arrange(&panel, Size::new(500.0, 500.0));
        assert_eq!(placed[0].0, Point::new(0.0, 0.0));
        assert_eq!(placed[1].0, Point::new(40.0, 0.0));
        // Line height is the tallest child on the first line.
        assert_eq!(placed[2].0, Point::new(0.0, 20.0));

        let size = LayoutContext::new().prepass(&panel, 1.0);
        assert_eq!(size, Size::new(80.0, 30.0));
    }

    #[test]
    fn test_no_child_crosses_preferred_width() {
        let widths = [30.0, 55.0, 20.0, 70.0, 10.0, 45.0, 90.0, 5.0];
        let mut panel = WrapBox::new()
            .preferred_width(100.0)
            .inner_slot_padding(Size::new(4.0, 2.0));
        for width in widths {
            panel.add_slot(WrapSlot::new(leaf(width, 10.0)));
        }
        let panel = panel.into_ref();

        for (position, size) in arrange(&panel, Size::new(100.0, 500.0)) {
            assert!(position.x + size.width <= 100.0, "{position:?} {size:?}");
        }
    }

    #[test]
    fn test_oversized_child_gets_own_line() {
        let panel = WrapBox::new()
            .preferred_width(100.0)
            .slot(WrapSlot::new(leaf(30.0, 10.0)))
            .slot(WrapSlot::new(leaf(250.0, 10.0)))
            .slot(WrapSlot::new(leaf(30.0, 10.0)))
            .into_ref();

        let placed = arrange(&panel, Size::new(100.0, 100.0));
        assert_eq!(placed[1].0, Point::new(0.0, 10.0));
        assert_eq!(placed[1].1.width, 250.0);
        assert_eq!(placed[2].0, Point::new(0.0, 20.0));
    }

    #[test]
    fn test_fill_empty_space_on_last_child() {
        let panel = WrapBox::new()
            .preferred_width(100.0)
            .slot(WrapSlot::new(leaf(30.0, 10.0)))
            .slot(WrapSlot::new(leaf(20.0, 10.0)).fill_empty_space(true))
            .into_ref();

        let placed = arrange(&panel, Size::new(100.0, 100.0));
        assert_eq!(placed[1].0.x, 30.0);
        assert_eq!(placed[1].1.width, 70.0);
    }

    #[test]
    fn test_fill_line_below_threshold() {
        let panel = WrapBox::new()
            .preferred_width(100.0)
            .slot(WrapSlot::new(leaf(30.0, 10.0)))
            .slot(WrapSlot::new(leaf(20.0, 10.0)).fill_line_when_width_less_than(150.0))
            .slot(WrapSlot::new(leaf(20.0, 10.0)))
            .into_ref();

        let placed = arrange(&panel, Size::new(100.0, 100.0));
        assert_eq!(placed[1].0, Point::new(0.0, 10.0));
        assert_eq!(placed[1].1.width, 100.0);
        // The line after a filled line starts fresh.
        assert_eq!(placed[2].0, Point::new(0.0, 20.0));
    }

    #[test]
    fn test_fill_line_above_threshold_is_normal() {
        let panel = WrapBox::new()
            .preferred_width(200.0)
            .slot(WrapSlot::new(leaf(30.0, 10.0)))
            .slot(WrapSlot::new(leaf(20.0, 10.0)).fill_line_when_width_less_than(150.0))
            .into_ref();

        let placed = arrange(&panel, Size::new(200.0, 100.0));
        assert_eq!(placed[1].0, Point::new(30.0, 0.0));
        assert_eq!(placed[1].1.width, 20.0);
    }

    #[test]
    fn test_force_new_line() {
        let panel = WrapBox::new()
            .preferred_width(100.0)
            .inner_slot_padding(Size::new(0.0, 5.0))
            .slot(WrapSlot::new(leaf(10.0, 10.0)))
            .slot(WrapSlot::new(leaf(10.0, 10.0)).force_new_line(true))
            .into_ref();

        let placed = arrange(&panel, Size::new(100.0, 100.0));
        assert_eq!(placed[1].0, Point::new(0.0, 15.0));
    }

    #[test]
    fn test_use_allotted_width() {
        let panel = WrapBox::new()
            .preferred_width(100.0)
            .use_allotted_width(true)
            .slot(WrapSlot::new(leaf(40.0, 10.0)))
            .slot(WrapSlot::new(leaf(40.0, 10.0)))
            .into_ref();

        let placed = arrange(&panel, Size::new(60.0, 100.0));
        assert_eq!(placed[1].0, Point::new(0.0, 10.0));
    }

    #[test]
    fn test_collapsed_child_skipped() {
        let collapsed = Spacer::new(500.0, 500.0)
            .with_visibility(Visibility::Collapsed)
            .into_ref();
        let panel = WrapBox::new()
            .slot(WrapSlot::new(leaf(10.0, 10.0)))
            .slot(WrapSlot::new(collapsed))
            .slot(WrapSlot::new(leaf(10.0, 10.0)))
            .into_ref();

        let size = LayoutContext::new().prepass(&panel, 1.0);
        assert_eq!(size, Size::new(20.0, 10.0));
        assert_eq!(arrange(&panel, Size::new(100.0, 100.0)).len(), 2);
    }
}
