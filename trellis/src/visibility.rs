//! Widget visibility and the masks used to filter arranged output.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Bit mask over the visibility categories.
    ///
    /// Every `Visibility` maps onto a combination of these bits; an
    /// `ArrangedChildren` collector accepts a widget when its bits intersect
    /// the collector's filter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct VisibilityFilter: u8 {
        const VISIBLE = 1 << 0;
        const COLLAPSED = 1 << 1;
        const HIDDEN = 1 << 2;
        const SELF_HIT_TEST = 1 << 3;
        const CHILDREN_HIT_TEST = 1 << 4;
    }
}

impl VisibilityFilter {
    /// Accepts everything that takes part in layout (visible and hidden).
    pub const LAYOUT: Self = Self::VISIBLE.union(Self::HIDDEN);

    /// Accepts everything that is painted.
    pub const PAINT: Self = Self::VISIBLE;

    /// Accepts widgets that can be hit by the pointer themselves.
    pub const HIT_TEST: Self = Self::SELF_HIT_TEST;
}

/// Visibility of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Painted and hit-testable.
    #[default]
    Visible,
    /// Occupies space but is neither painted nor hit-tested.
    Hidden,
    /// Removed from layout entirely.
    Collapsed,
    /// Painted, but neither it nor its children can be hit.
    HitTestInvisible,
    /// Painted, only its children can be hit.
    SelfHitTestInvisible,
}

impl Visibility {
    /// Bits this visibility sets in a `VisibilityFilter`.
    pub fn bits(self) -> VisibilityFilter {
        match self {
            Visibility::Visible => {
                VisibilityFilter::VISIBLE
                    | VisibilityFilter::SELF_HIT_TEST
                    | VisibilityFilter::CHILDREN_HIT_TEST
            }
            Visibility::Hidden => VisibilityFilter::HIDDEN,
            Visibility::Collapsed => VisibilityFilter::COLLAPSED,
            Visibility::HitTestInvisible => VisibilityFilter::VISIBLE,
            Visibility::SelfHitTestInvisible => {
                VisibilityFilter::VISIBLE | VisibilityFilter::CHILDREN_HIT_TEST
            }
        }
    }

    #[inline]
    pub fn is_collapsed(self) -> bool {
        self == Visibility::Collapsed
    }

    /// Whether the widget is painted.
    #[inline]
    pub fn is_visible(self) -> bool {
        self.bits().contains(VisibilityFilter::VISIBLE)
    }

    /// Whether the widget itself can be hit.
    #[inline]
    pub fn is_hit_testable(self) -> bool {
        self.bits().contains(VisibilityFilter::SELF_HIT_TEST)
    }

    /// Whether the widget's children can be hit.
    #[inline]
    pub fn are_children_hit_testable(self) -> bool {
        self.bits().contains(VisibilityFilter::CHILDREN_HIT_TEST)
    }
}
