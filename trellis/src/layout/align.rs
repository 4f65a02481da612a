//! Per-axis child placement.
//!
//! `align_axis` is the one function every layout algorithm uses to turn a
//! slot extent, a child length, an alignment and margins into the child's
//! offset and length on one axis. It is called independently for the
//! horizontal and vertical axes.

use super::children::SlotLayout;
use super::length::Align;
use crate::primitives::{Orientation, Size};

/// Offset and length of a child along one axis, relative to its slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisPlacement {
    pub offset: f32,
    pub length: f32,
}

impl AxisPlacement {
    #[inline]
    pub const fn new(offset: f32, length: f32) -> Self {
        Self { offset, length }
    }
}

/// Place a child of `child_length` inside `available` along one axis.
///
/// - `Fill` takes `available - margins`, starting at the leading margin.
/// - Otherwise the child keeps its own length, clamped to the space inside
///   the margins when `clamp_to_available` is set, and is positioned at the
///   start, center or end.
///
/// Derived lengths never go below zero.
pub fn align_axis(
    available: f32,
    child_length: f32,
    align: Align,
    margin_leading: f32,
    margin_trailing: f32,
    clamp_to_available: bool,
) -> AxisPlacement {
    let total_margin = margin_leading + margin_trailing;
    let inner = available - total_margin;

    if align == Align::Fill {
        return AxisPlacement::new(margin_leading, inner.max(0.0));
    }

    let length = if clamp_to_available {
        child_length.min(inner)
    } else {
        child_length
    }
    .max(0.0);

    let offset = match align {
        Align::Start | Align::Fill => margin_leading,
        Align::Center => (available - length) / 2.0 + margin_leading - margin_trailing,
        Align::End => available - length - margin_trailing,
    };

    AxisPlacement::new(offset, length)
}

/// Place a child within a slot along `orientation`, reading alignment and
/// padding from the slot and the child length from its desired size.
#[inline]
pub fn align_child(
    orientation: Orientation,
    available: f32,
    slot: &SlotLayout,
    child_desired: Size,
) -> AxisPlacement {
    align_axis(
        available,
        child_desired.along(orientation),
        slot.align(orientation),
        slot.padding.leading(orientation),
        slot.padding.trailing(orientation),
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::length::Padding;

    #[test]
    fn fill_ignores_child_length() {
        let p = align_axis(100.0, 10.0, Align::Fill, 5.0, 15.0, true);
        assert_eq!(p, AxisPlacement::new(5.0, 80.0));

        let p = align_axis(100.0, 500.0, Align::Fill, 5.0, 15.0, false);
        assert_eq!(p, AxisPlacement::new(5.0, 80.0));
    }

    #[test]
    fn start_center_end() {
        assert_eq!(align_axis(100.0, 20.0, Align::Start, 4.0, 6.0, true), AxisPlacement::new(4.0, 20.0));
        assert_eq!(align_axis(100.0, 20.0, Align::Center, 4.0, 6.0, true), AxisPlacement::new(38.0, 20.0));
        assert_eq!(align_axis(100.0, 20.0, Align::End, 4.0, 6.0, true), AxisPlacement::new(74.0, 20.0));
    }

    #[test]
    fn clamps_oversized_child() {
        let clamped = align_axis(50.0, 80.0, Align::Start, 5.0, 5.0, true);
        assert_eq!(clamped.length, 40.0);

        let unclamped = align_axis(50.0, 80.0, Align::Start, 5.0, 5.0, false);
        assert_eq!(unclamped.length, 80.0);
    }

    #[test]
    fn degenerate_available_length_never_negative() {
        let p = align_axis(0.0, 10.0, Align::Fill, 5.0, 5.0, true);
        assert_eq!(p.length, 0.0);

        let p = align_axis(-20.0, 10.0, Align::Center, 0.0, 0.0, true);
        assert_eq!(p.length, 0.0);
        assert!(!p.offset.is_nan());
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let a = align_axis(123.0, 45.5, Align::Center, 1.0, 2.0, true);
        let b = align_axis(123.0, 45.5, Align::Center, 1.0, 2.0, true);
        assert_eq!(a, b);
    }

    #[test]
    fn align_child_reads_slot_attributes() {
        let slot = SlotLayout {
            h_align: Align::End,
            v_align: Align::Start,
            padding: Padding::new(1.0, 2.0, 3.0, 4.0),
        };
        let desired = Size::new(10.0, 20.0);

        let h = align_child(Orientation::Horizontal, 100.0, &slot, desired);
        assert_eq!(h, AxisPlacement::new(88.0, 10.0));

        let v = align_child(Orientation::Vertical, 100.0, &slot, desired);
        assert_eq!(v, AxisPlacement::new(1.0, 20.0));
    }
}
