//! Arrangement output.
//!
//! `ArrangedChildren` collects the (widget, geometry) pairs a widget produces
//! in `arrange_children`, dropping widgets whose visibility fails the
//! collector's filter. Collapsed widgets are never accepted.

use std::rc::Rc;

use crate::geometry::Geometry;
use crate::visibility::{Visibility, VisibilityFilter};
use crate::widget::WidgetRef;

/// A widget paired with the geometry it was arranged at.
#[derive(Clone)]
pub struct ArrangedWidget {
    pub widget: WidgetRef,
    pub geometry: Geometry,
}

impl ArrangedWidget {
    pub fn new(widget: WidgetRef, geometry: Geometry) -> Self {
        Self { widget, geometry }
    }

    /// Whether this entry refers to `widget`.
    pub fn is(&self, widget: &WidgetRef) -> bool {
        Rc::ptr_eq(&self.widget, widget)
    }
}

impl std::fmt::Debug for ArrangedWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrangedWidget")
            .field("widget", &self.widget.borrow().debug_label())
            .field("geometry", &self.geometry)
            .finish()
    }
}

/// Filtered, ordered output of one `arrange_children` call.
#[derive(Debug, Clone)]
pub struct ArrangedChildren {
    filter: VisibilityFilter,
    entries: Vec<ArrangedWidget>,
}

impl ArrangedChildren {
    pub fn new(filter: VisibilityFilter) -> Self {
        Self {
            filter,
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn filter(&self) -> VisibilityFilter {
        self.filter
    }

    /// Whether a widget with `visibility` would be kept.
    #[inline]
    pub fn accepts(&self, visibility: Visibility) -> bool {
        !visibility.is_collapsed() && visibility.bits().intersects(self.filter)
    }

    /// Add `widget` at `geometry` if its visibility passes the filter.
    /// Returns whether it was added.
    pub fn add_widget(&mut self, widget: WidgetRef, geometry: Geometry) -> bool {
        let visibility = widget.borrow().visibility();
        if !self.accepts(visibility) {
            return false;
        }
        self.entries.push(ArrangedWidget::new(widget, geometry));
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&ArrangedWidget> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArrangedWidget> {
        self.entries.iter()
    }

    /// Entry for `widget`, if it was arranged.
    pub fn find(&self, widget: &WidgetRef) -> Option<&ArrangedWidget> {
        self.entries.iter().find(|entry| entry.is(widget))
    }

    pub fn into_vec(self) -> Vec<ArrangedWidget> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a ArrangedChildren {
    type Item = &'a ArrangedWidget;
    type IntoIter = std::slice::Iter<'a, ArrangedWidget>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
