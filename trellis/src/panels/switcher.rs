//! WidgetSwitcher - holds N children and shows one.

use crate::geometry::Geometry;
use crate::layout::align::align_child;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{impl_slot_builders, Children, PanelSlot, SlotBase, SwitcherChildren};
use crate::primitives::{Orientation, Point, Size};
use crate::widget::{Widget, WidgetBase, WidgetRef};

/// A child of a `WidgetSwitcher`.
#[derive(Debug, Clone)]
pub struct SwitcherSlot {
    base: SlotBase,
}

impl_slot_builders!(SwitcherSlot);

impl SwitcherSlot {
    pub fn new(widget: WidgetRef) -> Self {
        Self {
            base: SlotBase::new(widget),
        }
    }
}

/// Exposes only its active child to layout.
///
/// The first slot added becomes active. Inactive children are invisible to
/// both passes; their caches are left untouched.
#[derive(Default)]
pub struct WidgetSwitcher {
    base: WidgetBase,
    children: SwitcherChildren<SwitcherSlot>,
}

impl WidgetSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(mut self, slot: SwitcherSlot) -> Self {
        self.children.push(slot);
        self
    }

    /// Builder form of `set_active_index`. Out-of-range indices are ignored.
    pub fn active(mut self, index: usize) -> Self {
        self.children.set_active_index(index);
        self
    }

    pub fn active_index(&self) -> Option<usize> {
        self.children.active_index()
    }

    pub fn active_widget(&self) -> Option<&WidgetRef> {
        self.children.active_slot().map(|slot| slot.widget())
    }

    /// Select the exposed child. Returns false when `index` is out of range.
    pub fn set_active_index(&mut self, index: usize) -> bool {
        if self.children.active_index() == Some(index) {
            return true;
        }
        let changed = self.children.set_active_index(index);
        if changed {
            tracing::trace!(index, "switcher active index changed");
            self.base.invalidate();
        }
        changed
    }

    pub fn add_slot(&mut self, slot: SwitcherSlot) -> usize {
        self.children.push(slot);
        self.base.invalidate();
        self.children.len() - 1
    }

    pub fn insert_slot(&mut self, index: usize, slot: SwitcherSlot) {
        self.children.insert(index, slot);
        self.base.invalidate();
    }

    pub fn remove_slot(&mut self, index: usize) -> SwitcherSlot {
        self.base.invalidate();
        self.children.remove(index)
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
        self.base.invalidate();
    }

    pub fn num_slots(&self) -> usize {
        self.children.len()
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut SwitcherSlot> {
        self.base.invalidate();
        self.children.get_mut(index)
    }
}

impl Widget for WidgetSwitcher {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "WidgetSwitcher"
    }

    fn children(&self) -> &dyn Children {
        &self.children
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        match self.children.active_slot() {
            Some(slot) => {
                let child = slot.widget().borrow();
                if child.visibility().is_collapsed() {
                    Size::ZERO
                } else {
                    child.desired_size() + slot.layout().padding.desired_size()
                }
            }
            None => Size::ZERO,
        }
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        let Some(slot) = self.children.active_slot() else {
            return;
        };
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
