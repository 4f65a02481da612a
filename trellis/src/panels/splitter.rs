//! Splitter - interactively resizable proportional layout.
//!
//! Children are laid out along one axis with a handle between every pair of
//! visible neighbours. Each `FractionOfParent` slot owns a coefficient; the
//! space left after handles and `SizeToContent` slots is shared in
//! proportion to those coefficients.
//!
//! Dragging a handle converts the pointer delta into new coefficients for
//! the resizable slot before the handle and the affected slots after it,
//! honoring a minimum length per slot. The coefficients of the affected
//! group are rescaled together, so the sum over all slots never changes.
//!
//! # State machine
//!
//! ```text
//! Idle -> Hovering(handle) -> Dragging -> Idle
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::layout::arranged::ArrangedChildren;
use crate::layout::children::{impl_slot_builders, Children, PanelChildren, PanelSlot, SlotBase};
use crate::primitives::{Orientation, Point, Size};
use crate::widget::{EventResult, Widget, WidgetBase, WidgetRef};

pub const DEFAULT_PHYSICAL_HANDLE_SIZE: f32 = 5.0;
pub const DEFAULT_HIT_DETECTION_HANDLE_SIZE: f32 = 5.0;
pub const DEFAULT_MIN_CHILD_LENGTH: f32 = 20.0;

/// Deltas smaller than this are treated as fully distributed.
const RESIZE_EPSILON: f32 = 1e-4;

/// How a slot's length is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeRule {
    /// A share of the resizable space proportional to the slot's value.
    #[default]
    FractionOfParent,
    /// The child's desired length. Not resizable.
    SizeToContent,
}

/// Which slots after a handle absorb a drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Only the nearest resizable slot after the handle.
    #[default]
    FixedPosition,
    /// Every resizable slot after the handle, only the last one changes.
    FixedSize,
    /// Every resizable slot after the handle, evenly.
    Fill,
}

/// Invoked with a slot's new coefficient after a resize.
pub type SlotResizedCallback = Box<dyn FnMut(f32)>;

// =========================================================================
// SplitterSlot
// =========================================================================

/// A child of a `Splitter`.
pub struct SplitterSlot {
    base: SlotBase,
    size_rule: SizeRule,
    value: f32,
    min_size: f32,
    resizable: bool,
    on_slot_resized: Option<SlotResizedCallback>,
}

impl_slot_builders!(SplitterSlot);

impl SplitterSlot {
    /// A resizable slot with coefficient 1.
    pub fn new(widget: WidgetRef) -> Self {
        Self {
            base: SlotBase::new(widget),
            size_rule: SizeRule::FractionOfParent,
            value: 1.0,
            min_size: 0.0,
            resizable: true,
            on_slot_resized: None,
        }
    }

    pub fn size_rule(mut self, rule: SizeRule) -> Self {
        self.size_rule = rule;
        self
    }

    /// Set the proportional coefficient.
    pub fn value(mut self, value: f32) -> Self {
        self.value = value.max(0.0);
        self
    }

    /// Minimum length, on top of the splitter-wide minimum.
    pub fn min_size(mut self, min_size: f32) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn on_slot_resized(mut self, callback: impl FnMut(f32) + 'static) -> Self {
        self.on_slot_resized = Some(Box::new(callback));
        self
    }

    pub fn rule(&self) -> SizeRule {
        self.size_rule
    }

    pub fn size_value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.max(0.0);
    }

    pub fn min(&self) -> f32 {
        self.min_size
    }

    /// Whether a drag may change this slot.
    pub fn can_be_resized(&self) -> bool {
        self.resizable && self.size_rule == SizeRule::FractionOfParent
    }

    /// Store a new coefficient and notify the listener.
    fn apply_value(&mut self, value: f32) {
        self.value = value;
        if let Some(callback) = self.on_slot_resized.as_mut() {
            callback(value);
        }
    }
}

// =========================================================================
// State
// =========================================================================

/// Values captured when a drag starts. Every move is applied against these,
/// so a drag never accumulates rounding error.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub handle: usize,
    /// Pointer position along the splitter axis, in local space.
    pub origin: f32,
    /// Slot lengths at drag start (zero for collapsed slots).
    pub lengths: Vec<f32>,
    /// Slot coefficients at drag start.
    pub values: Vec<f32>,
}

/// Interaction state of a splitter.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SplitterState {
    #[default]
    Idle,
    Hovering {
        handle: usize,
    },
    Dragging(DragSession),
}

/// A handle between two visible slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleRegion {
    /// Handle index: the slot index just before the next visible slot.
    pub handle: usize,
    /// Center of the physical gap along the splitter axis, in local space.
    pub center: f32,
}

// =========================================================================
// Splitter
// =========================================================================

/// A container whose children can be resized by dragging the handles
/// between them.
pub struct Splitter {
    base: WidgetBase,
    children: PanelChildren<SplitterSlot>,
    orientation: Orientation,
    resize_mode: ResizeMode,
    physical_handle_size: f32,
    hit_detection_handle_size: f32,
    min_child_length: f32,
    state: SplitterState,
}

impl Splitter {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            base: WidgetBase::new(),
            children: PanelChildren::new(),
            orientation,
            resize_mode: ResizeMode::default(),
            physical_handle_size: DEFAULT_PHYSICAL_HANDLE_SIZE,
            hit_detection_handle_size: DEFAULT_HIT_DETECTION_HANDLE_SIZE,
            min_child_length: DEFAULT_MIN_CHILD_LENGTH,
            state: SplitterState::Idle,
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// Add a slot.
    pub fn slot(mut self, slot: SplitterSlot) -> Self {
        self.children.push(slot);
        self
    }

    pub fn resize_mode(mut self, mode: ResizeMode) -> Self {
        self.resize_mode = mode;
        self
    }

    /// Set the visual gap between children.
    pub fn physical_handle_size(mut self, size: f32) -> Self {
        self.physical_handle_size = size.max(0.0);
        self
    }

    /// Set the width of the zone around each gap that grabs the pointer.
    pub fn hit_detection_handle_size(mut self, size: f32) -> Self {
        self.hit_detection_handle_size = size.max(0.0);
        self
    }

    /// Set the length no resizable child can be dragged below.
    pub fn min_child_length(mut self, length: f32) -> Self {
        self.min_child_length = length.max(0.0);
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.base.invalidate();
    }

    pub fn set_resize_mode(&mut self, mode: ResizeMode) {
        self.resize_mode = mode;
    }

    pub fn add_slot(&mut self, slot: SplitterSlot) -> usize {
        self.children.push(slot);
        self.base.invalidate();
        self.children.len() - 1
    }

    pub fn insert_slot(&mut self, index: usize, slot: SplitterSlot) {
        self.children.insert(index, slot);
        self.base.invalidate();
    }

    pub fn remove_slot(&mut self, index: usize) -> SplitterSlot {
        self.state = SplitterState::Idle;
        self.base.invalidate();
        self.children.remove(index)
    }

    pub fn remove_widget(&mut self, widget: &WidgetRef) -> bool {
        self.state = SplitterState::Idle;
        self.base.invalidate();
        self.children.remove_widget(widget).is_some()
    }

    pub fn clear_children(&mut self) {
        self.state = SplitterState::Idle;
        self.children.clear();
        self.base.invalidate();
    }

    pub fn num_slots(&self) -> usize {
        self.children.len()
    }

    pub fn slot_at(&self, index: usize) -> Option<&SplitterSlot> {
        self.children.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut SplitterSlot> {
        self.base.invalidate();
        self.children.get_mut(index)
    }

    /// Current coefficients of every slot.
    pub fn values(&self) -> Vec<f32> {
        self.children.iter().map(|slot| slot.value).collect()
    }

    pub fn state(&self) -> &SplitterState {
        &self.state
    }

    pub fn hovered_handle(&self) -> Option<usize> {
        match self.state {
            SplitterState::Hovering { handle } => Some(handle),
            SplitterState::Dragging(ref session) => Some(session.handle),
            SplitterState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SplitterState::Dragging(_))
    }

    // ---------------------------------------------------------------------
    // Layout
    // ---------------------------------------------------------------------

    fn is_collapsed(slot: &SplitterSlot) -> bool {
        slot.widget().borrow().visibility().is_collapsed()
    }

    /// Length of every slot along the splitter axis for an allotted size.
    /// Collapsed slots get zero.
    pub fn child_lengths(&self, allotted: Size) -> Vec<f32> {
        let axis = self.orientation;
        let mut visible = 0usize;
        let mut coefficient_total = 0.0f32;
        let mut non_resizable = 0.0f32;

        for slot in self.children.iter() {
            if Self::is_collapsed(slot) {
                continue;
            }
            visible += 1;
            match slot.size_rule {
                SizeRule::SizeToContent => non_resizable += slot.widget().borrow().desired_size().along(axis),
                SizeRule::FractionOfParent => coefficient_total += slot.value,
            }
        }

        let handles = visible.saturating_sub(1) as f32 * self.physical_handle_size;
        let resizable_space = (allotted.along(axis) - handles - non_resizable).max(0.0);

        self.children
            .iter()
            .map(|slot| {
                if Self::is_collapsed(slot) {
                    return 0.0;
                }
                match slot.size_rule {
                    SizeRule::SizeToContent => slot.widget().borrow().desired_size().along(axis),
                    SizeRule::FractionOfParent if coefficient_total > 0.0 => {
                        resizable_space * slot.value / coefficient_total
                    }
                    SizeRule::FractionOfParent => 0.0,
                }
            })
            .collect()
    }

    /// Start offset of every slot along the splitter axis.
    fn child_offsets(&self, lengths: &[f32]) -> Vec<f32> {
        let mut offset = 0.0f32;
        self.children
            .iter()
            .zip(lengths)
            .map(|(slot, length)| {
                let start = offset;
                if !Self::is_collapsed(slot) {
                    offset += length + self.physical_handle_size;
                }
                start
            })
            .collect()
    }

    /// Every handle between two visible slots, in order.
    pub fn handle_regions(&self, allotted: Size) -> Vec<HandleRegion> {
        let lengths = self.child_lengths(allotted);
        let offsets = self.child_offsets(&lengths);

        let mut regions = Vec::new();
        let mut previous: Option<usize> = None;
        for (index, slot) in self.children.iter().enumerate() {
            if Self::is_collapsed(slot) {
                continue;
            }
            if let Some(prev) = previous {
                let prev_end = offsets[prev] + lengths[prev];
                regions.push(HandleRegion {
                    handle: index - 1,
                    center: prev_end + self.physical_handle_size / 2.0,
                });
            }
            previous = Some(index);
        }
        regions
    }

    /// Handle under a local-space position, ignoring inert handles.
    pub fn handle_at(&self, local: Point, allotted: Size) -> Option<usize> {
        let position = local.along(self.orientation);
        let half_hit = self.hit_detection_handle_size / 2.0;
        self.handle_regions(allotted)
            .into_iter()
            .find(|region| position > region.center - half_hit && position < region.center + half_hit)
            .map(|region| region.handle)
            .filter(|&handle| self.is_handle_active(handle))
    }

    /// A handle is inert unless there is a resizable slot on both sides.
    pub fn is_handle_active(&self, handle: usize) -> bool {
        self.resizable_slot_before(handle).is_some() && !self.resizable_slots_after(handle, ResizeMode::Fill).is_empty()
    }

    fn is_resizable(slot: &SplitterSlot) -> bool {
        slot.can_be_resized() && !Self::is_collapsed(slot)
    }

    /// Nearest resizable slot at or before `handle`.
    fn resizable_slot_before(&self, handle: usize) -> Option<usize> {
        (0..=handle.min(self.children.len().saturating_sub(1)))
            .rev()
            .find(|&index| self.children.get(index).is_some_and(Self::is_resizable))
    }

    /// Resizable slots after `handle` affected under `mode`.
    fn resizable_slots_after(&self, handle: usize, mode: ResizeMode) -> Vec<usize> {
        let mut after = (handle + 1..self.children.len()).filter(|&index| Self::is_resizable(&self.children[index]));
        match mode {
            ResizeMode::FixedPosition => after.next().into_iter().collect(),
            ResizeMode::FixedSize | ResizeMode::Fill => after.collect(),
        }
    }

    fn clamp_child(&self, slot: &SplitterSlot, length: f32) -> f32 {
        length.max(self.min_child_length.max(slot.min_size))
    }

    // ---------------------------------------------------------------------
    // Resizing
    // ---------------------------------------------------------------------

    /// Move `handle` by `delta` pixels for a splitter arranged at
    /// `allotted`. Deltas that cannot be absorbed because slots hit their
    /// minimum length are capped.
    pub fn resize_handle(&mut self, handle: usize, delta: f32, allotted: Size) {
        let lengths = self.child_lengths(allotted);
        self.apply_resize(handle, delta, &lengths);
    }

    fn apply_resize(&mut self, handle: usize, delta: f32, lengths: &[f32]) {
        let nexts = self.resizable_slots_after(handle, self.resize_mode);
        let Some(prev) = self.resizable_slot_before(handle) else {
            return;
        };
        if nexts.is_empty() {
            return;
        }

        let prev_length = lengths[prev];
        let new_prev_length = self.clamp_child(&self.children[prev], prev_length + delta);
        let delta = new_prev_length - prev_length;

        // Take the delta from the slots after the handle. Whatever a slot
        // cannot give because of its minimum is shared again among the slots
        // that still can, until nothing is left or nobody can absorb more.
        let mut next_lengths: Vec<f32> = nexts.iter().map(|&index| lengths[index]).collect();
        let mut absorbing: Vec<usize> = match self.resize_mode {
            ResizeMode::FixedSize => vec![nexts.len() - 1],
            ResizeMode::FixedPosition | ResizeMode::Fill => (0..nexts.len()).collect(),
        };
        let mut unused = delta;
        while unused.abs() > RESIZE_EPSILON && !absorbing.is_empty() {
            let share = unused / absorbing.len() as f32;
            unused = 0.0;
            let mut still_absorbing = Vec::with_capacity(absorbing.len());
            for position in absorbing {
                let target = next_lengths[position] - share;
                let clamped = self.clamp_child(&self.children[nexts[position]], target);
                unused += clamped - target;
                next_lengths[position] = clamped;
                if clamped == target {
                    still_absorbing.push(position);
                }
            }
            absorbing = still_absorbing;
        }
        if unused.abs() > RESIZE_EPSILON {
            tracing::trace!(handle, unused, "resize delta capped at minimum sizes");
        } else {
            unused = 0.0;
        }

        let delta = delta - unused;
        let new_prev_length = self.clamp_child(&self.children[prev], prev_length + delta);

        let total_length: f32 = new_prev_length + next_lengths.iter().sum::<f32>();
        let total_coefficient: f32 =
            self.children[prev].value + nexts.iter().map(|&index| self.children[index].value).sum::<f32>();
        if total_length <= 0.0 {
            return;
        }

        self.children[prev].apply_value(total_coefficient * new_prev_length / total_length);
        for (&index, length) in nexts.iter().zip(next_lengths) {
            self.children[index].apply_value(total_coefficient * length / total_length);
        }
    }

    // ---------------------------------------------------------------------
    // Pointer interaction
    // ---------------------------------------------------------------------

    fn set_state(&mut self, state: SplitterState) {
        if std::mem::discriminant(&state) != std::mem::discriminant(&self.state) {
            tracing::debug!(from = ?self.state, to = ?state, "splitter state");
        }
        self.state = state;
    }

    /// Pointer moved to an absolute position over a splitter arranged at
    /// `allotted`.
    pub fn on_pointer_move(&mut self, allotted: &Geometry, absolute: Point) -> EventResult {
        let local = allotted.absolute_to_local(absolute);

        if let SplitterState::Dragging(session) = &self.state {
            let session = session.clone();
            for (slot, value) in self.children.iter_mut().zip(&session.values) {
                slot.value = *value;
            }
            let delta = local.along(self.orientation) - session.origin;
            self.apply_resize(session.handle, delta, &session.lengths);
            return EventResult::Handled;
        }

        match self.handle_at(local, allotted.size) {
            Some(handle) => {
                self.set_state(SplitterState::Hovering { handle });
                EventResult::Handled
            }
            None => {
                self.set_state(SplitterState::Idle);
                EventResult::Ignored
            }
        }
    }

    /// Pointer pressed. Starts a drag when over an active handle.
    pub fn on_pointer_down(&mut self, allotted: &Geometry, absolute: Point) -> EventResult {
        let local = allotted.absolute_to_local(absolute);
        let Some(handle) = self.handle_at(local, allotted.size) else {
            return EventResult::Ignored;
        };

        let session = DragSession {
            handle,
            origin: local.along(self.orientation),
            lengths: self.child_lengths(allotted.size),
            values: self.values(),
        };
        self.set_state(SplitterState::Dragging(session));
        EventResult::CapturePointer
    }

    /// Pointer released. Ends a drag.
    pub fn on_pointer_up(&mut self) -> EventResult {
        if self.is_dragging() {
            self.set_state(SplitterState::Idle);
            EventResult::ReleasePointer
        } else {
            EventResult::Ignored
        }
    }

    /// Pointer left the splitter. A drag keeps going while captured.
    pub fn on_pointer_leave(&mut self) {
        if !self.is_dragging() {
            self.set_state(SplitterState::Idle);
        }
    }
}

impl Widget for Splitter {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Splitter"
    }

    fn children(&self) -> &dyn Children {
        &self.children
    }

    fn compute_desired_size(&self, _layout_scale: f32) -> Size {
        let axis = self.orientation;
        let mut along = 0.0f32;
        let mut across = 0.0f32;
        let mut visible = 0usize;

        for slot in self.children.iter() {
            let child = slot.widget().borrow();
            if child.visibility().is_collapsed() {
                continue;
            }
            visible += 1;
            let desired = child.desired_size();
            along += desired.along(axis);
            across = across.max(desired.along(axis.cross()));
        }

        along += visible.saturating_sub(1) as f32 * self.physical_handle_size;
        Size::from_axes(axis, along, across)
    }

    fn arrange_children(&self, allotted: &Geometry, arranged: &mut ArrangedChildren) {
        let axis = self.orientation;
        let lengths = self.child_lengths(allotted.size);
        let offsets = self.child_offsets(&lengths);
        let cross = allotted.size.along(axis.cross());

        for ((slot, length), offset) in self.children.iter().zip(&lengths).zip(&offsets) {
            if Self::is_collapsed(slot) {
                continue;
            }
            let geometry = allotted.make_child(
                Point::from_axes(axis, *offset, 0.0),
                Size::from_axes(axis, *length, cross),
                1.0,
            );
            arranged.add_widget(slot.widget().clone(), geometry);
        }
    }
}
