//! Children and slots.
//!
//! `Children` is the read-only, index-addressable view a parent exposes over
//! its slots. The storage behind it varies:
//!
//! - `NoChildren`: leaves.
//! - `SingleChild`: exactly one slot, holding the null widget when empty.
//! - `PanelChildren<S>`: an ordered list of algorithm-specific slots.
//! - `WeakChild`: a non-owning reference to at most one widget.
//! - `SwitcherChildren<S>`: N slots of which only the active one is exposed.
//!
//! Every slot type composes a `SlotBase` (the owned child plus alignment and
//! padding) with the fields its layout algorithm needs.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::length::{Align, Padding};
use crate::primitives::Orientation;
use crate::widget::{null_widget, WeakWidgetRef, WidgetRef};

/// Read-only view over a parent's children.
///
/// `num()` and `child_at()` must agree for the duration of a layout pass.
/// Indexing at or past `num()` is a programming error and panics.
pub trait Children {
    fn num(&self) -> usize;

    fn child_at(&self, index: usize) -> WidgetRef;

    /// Layout attributes of the slot at `index`.
    fn slot_at(&self, index: usize) -> &SlotLayout;
}

// =========================================================================
// Slots
// =========================================================================

/// Alignment and padding shared by every slot type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotLayout {
    pub h_align: Align,
    pub v_align: Align,
    pub padding: Padding,
}

impl SlotLayout {
    pub const DEFAULT: Self = Self {
        h_align: Align::Fill,
        v_align: Align::Fill,
        padding: Padding::ZERO,
    };

    /// Alignment along the given axis.
    #[inline]
    pub fn align(&self, orientation: Orientation) -> Align {
        match orientation {
            Orientation::Horizontal => self.h_align,
            Orientation::Vertical => self.v_align,
        }
    }
}

static DEFAULT_SLOT_LAYOUT: SlotLayout = SlotLayout::DEFAULT;

/// The owned child of a slot plus its common layout attributes.
#[derive(Clone)]
pub struct SlotBase {
    widget: WidgetRef,
    pub layout: SlotLayout,
}

impl Default for SlotBase {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for SlotBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotBase")
            .field("widget", &self.widget.borrow().debug_label())
            .field("layout", &self.layout)
            .finish()
    }
}

impl SlotBase {
    pub fn new(widget: WidgetRef) -> Self {
        Self {
            widget,
            layout: SlotLayout::DEFAULT,
        }
    }

    /// A slot holding the null widget.
    pub fn empty() -> Self {
        Self::new(null_widget())
    }

    #[inline]
    pub fn widget(&self) -> &WidgetRef {
        &self.widget
    }

    /// Replace the child, returning the previous one.
    pub fn attach(&mut self, widget: WidgetRef) -> WidgetRef {
        std::mem::replace(&mut self.widget, widget)
    }

    /// Remove the child, leaving the null widget in its place.
    pub fn detach(&mut self) -> WidgetRef {
        self.attach(null_widget())
    }
}

/// Implemented by every algorithm-specific slot type.
pub trait PanelSlot {
    fn slot_base(&self) -> &SlotBase;

    fn slot_base_mut(&mut self) -> &mut SlotBase;

    #[inline]
    fn widget(&self) -> &WidgetRef {
        self.slot_base().widget()
    }

    #[inline]
    fn layout(&self) -> &SlotLayout {
        &self.slot_base().layout
    }
}

/// Declares builder-style setters for the common slot attributes on a slot
/// type whose `SlotBase` lives in a field named `base`.
macro_rules! impl_slot_builders {
    ($slot:ty) => {
        impl $crate::layout::children::PanelSlot for $slot {
            fn slot_base(&self) -> &$crate::layout::children::SlotBase {
                &self.base
            }

            fn slot_base_mut(&mut self) -> &mut $crate::layout::children::SlotBase {
                &mut self.base
            }
        }

        impl $slot {
            pub fn h_align(mut self, align: $crate::layout::length::Align) -> Self {
                self.base.layout.h_align = align;
                self
            }

            pub fn v_align(mut self, align: $crate::layout::length::Align) -> Self {
                self.base.layout.v_align = align;
                self
            }

            pub fn padding(mut self, padding: $crate::layout::length::Padding) -> Self {
                self.base.layout.padding = padding;
                self
            }

            pub fn slot_layout(mut self, layout: $crate::layout::children::SlotLayout) -> Self {
                self.base.layout = layout;
                self
            }
        }
    };
}
pub(crate) use impl_slot_builders;

// =========================================================================
// Shapes
// =========================================================================

/// No children at all.
pub struct NoChildren;

impl Children for NoChildren {
    fn num(&self) -> usize {
        0
    }

    fn child_at(&self, index: usize) -> WidgetRef {
        panic!("NoChildren has no child at index {index}");
    }

    fn slot_at(&self, index: usize) -> &SlotLayout {
        panic!("NoChildren has no slot at index {index}");
    }
}

/// Exactly one slot. An empty slot holds the null widget.
#[derive(Debug, Clone, Default)]
pub struct SingleChild {
    pub slot: SlotBase,
}

impl SingleChild {
    pub fn new(widget: WidgetRef) -> Self {
        Self {
            slot: SlotBase::new(widget),
        }
    }

    #[inline]
    pub fn widget(&self) -> &WidgetRef {
        self.slot.widget()
    }
}

impl Children for SingleChild {
    fn num(&self) -> usize {
        1
    }

    fn child_at(&self, index: usize) -> WidgetRef {
        assert_eq!(index, 0, "SingleChild index out of range");
        Rc::clone(self.slot.widget())
    }

    fn slot_at(&self, index: usize) -> &SlotLayout {
        assert_eq!(index, 0, "SingleChild index out of range");
        &self.slot.layout
    }
}

/// An ordered list of slots.
#[derive(Debug, Clone)]
pub struct PanelChildren<S> {
    slots: Vec<S>,
}

impl<S> Default for PanelChildren<S> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<S: PanelSlot> PanelChildren<S> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn push(&mut self, slot: S) {
        self.slots.push(slot);
    }

    /// Insert at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, slot: S) {
        let index = index.min(self.slots.len());
        self.slots.insert(index, slot);
    }

    pub fn remove(&mut self, index: usize) -> S {
        assert!(index < self.slots.len(), "slot index {index} out of range");
        self.slots.remove(index)
    }

    /// Index of the slot owning `widget`.
    pub fn find(&self, widget: &WidgetRef) -> Option<usize> {
        self.slots.iter().position(|slot| Rc::ptr_eq(slot.widget(), widget))
    }

    /// Remove the slot owning `widget`. Returns its former index.
    pub fn remove_widget(&mut self, widget: &WidgetRef) -> Option<usize> {
        let index = self.find(widget)?;
        self.slots.remove(index);
        Some(index)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&S> {
        self.slots.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut S> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, S> {
        self.slots.iter_mut()
    }

    /// Stable sort of the slots.
    pub fn sort_by_key<K: Ord>(&mut self, key: impl FnMut(&S) -> K) {
        self.slots.sort_by_key(key);
    }
}

impl<S> std::ops::Index<usize> for PanelChildren<S> {
    type Output = S;

    fn index(&self, index: usize) -> &S {
        &self.slots[index]
    }
}

impl<S> std::ops::IndexMut<usize> for PanelChildren<S> {
    fn index_mut(&mut self, index: usize) -> &mut S {
        &mut self.slots[index]
    }
}

impl<S: PanelSlot> Children for PanelChildren<S> {
    fn num(&self) -> usize {
        self.slots.len()
    }

    fn child_at(&self, index: usize) -> WidgetRef {
        assert!(index < self.slots.len(), "child index {index} out of range");
        Rc::clone(self.slots[index].widget())
    }

    fn slot_at(&self, index: usize) -> &SlotLayout {
        assert!(index < self.slots.len(), "slot index {index} out of range");
        self.slots[index].layout()
    }
}

/// A non-owning reference to at most one externally owned widget.
///
/// Exposes one child while the referenced widget is alive and none once it
/// has been dropped.
#[derive(Debug, Clone, Default)]
pub struct WeakChild {
    widget: Option<WeakWidgetRef>,
}

impl WeakChild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, widget: &WidgetRef) {
        self.widget = Some(Rc::downgrade(widget));
    }

    pub fn detach(&mut self) {
        self.widget = None;
    }

    /// The referenced widget if it still exists.
    pub fn upgrade(&self) -> Option<WidgetRef> {
        self.widget.as_ref().and_then(|weak| weak.upgrade())
    }

    pub fn is_alive(&self) -> bool {
        self.widget.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }
}

impl Children for WeakChild {
    fn num(&self) -> usize {
        usize::from(self.is_alive())
    }

    fn child_at(&self, index: usize) -> WidgetRef {
        assert_eq!(index, 0, "WeakChild index out of range");
        self.upgrade().unwrap_or_else(null_widget)
    }

    fn slot_at(&self, index: usize) -> &SlotLayout {
        assert_eq!(index, 0, "WeakChild index out of range");
        &DEFAULT_SLOT_LAYOUT
    }
}

/// N slots of which only the active one is exposed.
///
/// Inserting or removing a slot before the active index shifts the index so
/// the same widget stays active.
#[derive(Debug, Clone)]
pub struct SwitcherChildren<S> {
    slots: PanelChildren<S>,
    active: Option<usize>,
}

impl<S> Default for SwitcherChildren<S> {
    fn default() -> Self {
        Self {
            slots: PanelChildren::default(),
            active: None,
        }
    }
}

impl<S: PanelSlot> SwitcherChildren<S> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Select the exposed slot. Returns false when `index` is out of range.
    pub fn set_active_index(&mut self, index: usize) -> bool {
        if index < self.slots.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    pub fn active_slot(&self) -> Option<&S> {
        self.active.and_then(|index| self.slots.get(index))
    }

    pub fn push(&mut self, slot: S) {
        self.slots.push(slot);
        if self.active.is_none() {
            self.active = Some(0);
        }
    }

    pub fn insert(&mut self, index: usize, slot: S) {
        let index = index.min(self.slots.len());
        self.slots.insert(index, slot);
        self.active = match self.active {
            None => Some(0),
            Some(active) if index <= active => Some(active + 1),
            other => other,
        };
    }

    pub fn remove(&mut self, index: usize) -> S {
        let slot = self.slots.remove(index);
        self.active = match self.active {
            _ if self.slots.is_empty() => None,
            Some(active) if index < active => Some(active - 1),
            Some(active) => Some(active.min(self.slots.len() - 1)),
            None => None,
        };
        slot
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.active = None;
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut S> {
        self.slots.get_mut(index)
    }

    /// Every slot, exposed or not.
    pub fn all(&self) -> &PanelChildren<S> {
        &self.slots
    }
}

impl<S: PanelSlot> Children for SwitcherChildren<S> {
    fn num(&self) -> usize {
        usize::from(self.active_slot().is_some())
    }

    fn child_at(&self, index: usize) -> WidgetRef {
        assert_eq!(index, 0, "SwitcherChildren index out of range");
        match self.active_slot() {
            Some(slot) => Rc::clone(slot.widget()),
            None => panic!("SwitcherChildren has no active slot"),
        }
    }

    fn slot_at(&self, index: usize) -> &SlotLayout {
        assert_eq!(index, 0, "SwitcherChildren index out of range");
        match self.active_slot() {
            Some(slot) => slot.layout(),
            None => panic!("SwitcherChildren has no active slot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{is_null_widget, WidgetExt};
    use crate::widgets::spacer::Spacer;

    #[derive(Default)]
    struct TestSlot {
        base: SlotBase,
    }

    impl TestSlot {
        fn new(widget: WidgetRef) -> Self {
            Self {
                base: SlotBase::new(widget),
            }
        }
    }

    impl_slot_builders!(TestSlot);

    fn leaf() -> WidgetRef {
        Spacer::new(1.0, 1.0).into_ref()
    }

    #[test]
    fn single_child_defaults_to_null_widget() {
        let single = SingleChild::default();
        assert_eq!(single.num(), 1);
        assert!(is_null_widget(&single.child_at(0)));
    }

    #[test]
    #[should_panic]
    fn single_child_out_of_range_panics() {
        SingleChild::default().child_at(1);
    }

    #[test]
    fn panel_children_index_and_find() {
        let (a, b) = (leaf(), leaf());
        let mut children = PanelChildren::new();
        children.push(TestSlot::new(a.clone()));
        children.push(TestSlot::new(b.clone()).h_align(Align::Center));

        assert_eq!(children.num(), 2);
        assert!(Rc::ptr_eq(&children.child_at(1), &b));
        assert_eq!(children.slot_at(1).h_align, Align::Center);
        assert_eq!(children.find(&a), Some(0));
        assert_eq!(children.remove_widget(&a), Some(0));
        assert_eq!(children.num(), 1);
    }

    #[test]
    #[should_panic]
    fn panel_children_out_of_range_panics() {
        let children: PanelChildren<TestSlot> = PanelChildren::new();
        children.child_at(0);
    }

    #[test]
    fn weak_child_tolerates_dropped_widget() {
        let mut weak = WeakChild::new();
        assert_eq!(weak.num(), 0);

        let widget = leaf();
        weak.attach(&widget);
        assert_eq!(weak.num(), 1);
        assert!(Rc::ptr_eq(&weak.child_at(0), &widget));

        drop(widget);
        assert_eq!(weak.num(), 0);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn switcher_exposes_only_active_slot() {
        let (a, b, c) = (leaf(), leaf(), leaf());
        let mut switcher = SwitcherChildren::new();
        switcher.push(TestSlot::new(a.clone()));
        switcher.push(TestSlot::new(b.clone()));
        switcher.push(TestSlot::new(c.clone()));

        assert_eq!(switcher.num(), 1);
        assert!(Rc::ptr_eq(&switcher.child_at(0), &a));

        assert!(switcher.set_active_index(2));
        assert!(Rc::ptr_eq(&switcher.child_at(0), &c));
        assert!(!switcher.set_active_index(3));
    }

    #[test]
    fn switcher_insert_before_active_keeps_widget() {
        let (a, b, c) = (leaf(), leaf(), leaf());
        let mut switcher = SwitcherChildren::new();
        switcher.push(TestSlot::new(a));
        switcher.push(TestSlot::new(b.clone()));
        switcher.set_active_index(1);

        switcher.insert(0, TestSlot::new(c));
        assert_eq!(switcher.active_index(), Some(2));
        assert!(Rc::ptr_eq(&switcher.child_at(0), &b));
    }

    #[test]
    fn switcher_remove_before_active_keeps_widget() {
        let (a, b, c) = (leaf(), leaf(), leaf());
        let mut switcher = SwitcherChildren::new();
        switcher.push(TestSlot::new(a));
        switcher.push(TestSlot::new(b));
        switcher.push(TestSlot::new(c.clone()));
        switcher.set_active_index(2);

        switcher.remove(0);
        assert_eq!(switcher.active_index(), Some(1));
        assert!(Rc::ptr_eq(&switcher.child_at(0), &c));

        // Removing the active slot selects the one that took its place.
        switcher.remove(1);
        assert_eq!(switcher.active_index(), Some(0));

        switcher.remove(0);
        assert_eq!(switcher.active_index(), None);
        assert_eq!(switcher.num(), 0);
    }
}
