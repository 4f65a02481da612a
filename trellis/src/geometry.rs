//! Widget geometry.
//!
//! A `Geometry` is an immutable description of where a widget sits: its
//! local size plus the transform accumulated from the root. Children are
//! never positioned by mutating a geometry; `make_child` derives a fresh one
//! from the parent and a local offset/size/scale.

use crate::primitives::{Point, Rect, Size};

/// Uniform scale followed by a translation.
///
/// `transform_point(p) = p * scale + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutTransform {
    pub scale: f32,
    pub translation: Point,
}

impl Default for LayoutTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl LayoutTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translation: Point::ORIGIN,
    };

    #[inline]
    pub const fn new(scale: f32, translation: Point) -> Self {
        Self { scale, translation }
    }

    #[inline]
    pub const fn from_translation(translation: Point) -> Self {
        Self { scale: 1.0, translation }
    }

    #[inline]
    pub const fn from_scale(scale: f32) -> Self {
        Self {
            scale,
            translation: Point::ORIGIN,
        }
    }

    #[inline]
    pub fn transform_point(&self, point: Point) -> Point {
        point * self.scale + self.translation
    }

    #[inline]
    pub fn transform_vector(&self, vector: Point) -> Point {
        vector * self.scale
    }

    /// Apply `self` first, then `outer`.
    #[inline]
    pub fn concatenate(&self, outer: &LayoutTransform) -> LayoutTransform {
        LayoutTransform {
            scale: self.scale * outer.scale,
            translation: outer.transform_point(self.translation),
        }
    }

    /// Inverse transform, or `None` for a zero scale.
    pub fn inverse(&self) -> Option<LayoutTransform> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return None;
        }
        let inv = 1.0 / self.scale;
        Some(LayoutTransform {
            scale: inv,
            translation: self.translation * -inv,
        })
    }
}

/// Resolved position, size and scale of a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Size in local space. Stored verbatim, never clamped.
    pub size: Size,
    /// Offset of this widget within its parent, in parent space.
    pub position: Point,
    /// Root-to-local layout transform.
    accumulated_layout: LayoutTransform,
    /// Root-to-local render transform (layout plus any render transforms).
    accumulated_render: LayoutTransform,
}

impl Geometry {
    /// Geometry for a root widget of the given size at the given layout scale.
    pub fn root(size: Size, layout_scale: f32) -> Self {
        let transform = LayoutTransform::from_scale(layout_scale);
        Self {
            size,
            position: Point::ORIGIN,
            accumulated_layout: transform,
            accumulated_render: transform,
        }
    }

    /// Derive a child geometry from a local offset, size and scale.
    pub fn make_child(&self, local_offset: Point, local_size: Size, local_scale: f32) -> Geometry {
        let local = LayoutTransform::new(local_scale, local_offset);
        Geometry {
            size: local_size,
            position: local_offset,
            accumulated_layout: local.concatenate(&self.accumulated_layout),
            accumulated_render: local.concatenate(&self.accumulated_render),
        }
    }

    /// Derive a child with an additional render transform applied about
    /// `pivot` (normalized, `(0.5, 0.5)` is the center of the child).
    ///
    /// Only the render transform is affected; layout queries keep using the
    /// untransformed placement.
    pub fn make_child_with_render_transform(
        &self,
        local_offset: Point,
        local_size: Size,
        local_scale: f32,
        render_transform: LayoutTransform,
        pivot: Point,
    ) -> Geometry {
        let local = LayoutTransform::new(local_scale, local_offset);
        let pivot_offset = Point::new(pivot.x * local_size.width, pivot.y * local_size.height);
        let local_render = LayoutTransform::from_translation(pivot_offset * -1.0)
            .concatenate(&render_transform)
            .concatenate(&LayoutTransform::from_translation(pivot_offset))
            .concatenate(&local);
        Geometry {
            size: local_size,
            position: local_offset,
            accumulated_layout: local.concatenate(&self.accumulated_layout),
            accumulated_render: local_render.concatenate(&self.accumulated_render),
        }
    }

    #[inline]
    pub fn accumulated_layout_transform(&self) -> LayoutTransform {
        self.accumulated_layout
    }

    #[inline]
    pub fn accumulated_render_transform(&self) -> LayoutTransform {
        self.accumulated_render
    }

    /// Accumulated scale from the root.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.accumulated_layout.scale
    }

    /// Position of the local origin in root space.
    #[inline]
    pub fn absolute_position(&self) -> Point {
        self.accumulated_layout.translation
    }

    /// Size in root space.
    #[inline]
    pub fn absolute_size(&self) -> Size {
        self.size * self.accumulated_layout.scale
    }

    /// Convert a root-space point into this geometry's local space.
    ///
    /// A zero-scale geometry collapses every point onto its origin.
    pub fn absolute_to_local(&self, absolute: Point) -> Point {
        match self.accumulated_layout.inverse() {
            Some(inverse) => inverse.transform_point(absolute),
            None => Point::ORIGIN,
        }
    }

    /// Convert a local point into root space.
    #[inline]
    pub fn local_to_absolute(&self, local: Point) -> Point {
        self.accumulated_layout.transform_point(local)
    }

    /// Layout bounds in root space.
    pub fn layout_bounding_rect(&self) -> Rect {
        Rect::from_origin_size(self.absolute_position(), self.absolute_size())
    }

    /// Render bounds in root space.
    pub fn render_bounding_rect(&self) -> Rect {
        let origin = self.accumulated_render.transform_point(Point::ORIGIN);
        let corner = self.accumulated_render.transform_point(self.size.to_point());
        let x = origin.x.min(corner.x);
        let y = origin.y.min(corner.y);
        Rect::new(x, y, (corner.x - origin.x).abs(), (corner.y - origin.y).abs())
    }

    /// Whether a root-space point falls inside the rendered bounds.
    #[inline]
    pub fn is_under_location(&self, absolute: Point) -> bool {
        self.render_bounding_rect().contains(absolute)
    }

    /// Local-space rectangle occupied within the parent.
    #[inline]
    pub fn rect_in_parent_space(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn root_geometry_scales_absolute_size() {
        let g = Geometry::root(Size::new(100.0, 50.0), 2.0);
        assert_eq!(g.size, Size::new(100.0, 50.0));
        assert_eq!(g.absolute_size(), Size::new(200.0, 100.0));
        assert_eq!(g.absolute_position(), Point::ORIGIN);
    }

    #[test]
    fn make_child_keeps_local_size_verbatim() {
        let g = Geometry::root(Size::new(10.0, 10.0), 1.0);
        let child = g.make_child(Point::new(5.0, 5.0), Size::new(-3.0, 400.0), 1.0);
        assert_eq!(child.size, Size::new(-3.0, 400.0));
    }

    #[test]
    fn child_offsets_compose_through_scale() {
        let root = Geometry::root(Size::new(800.0, 600.0), 1.0);
        let panel = root.make_child(Point::new(100.0, 50.0), Size::new(200.0, 200.0), 2.0);
        let leaf = panel.make_child(Point::new(10.0, 10.0), Size::new(5.0, 5.0), 1.0);

        assert!(approx(leaf.absolute_position(), Point::new(120.0, 70.0)));
        assert_eq!(leaf.scale(), 2.0);
        assert_eq!(leaf.absolute_size(), Size::new(10.0, 10.0));
    }

    #[test]
    fn composition_is_associative() {
        let root = Geometry::root(Size::new(500.0, 500.0), 1.5);

        let parent = root.make_child(Point::new(20.0, 30.0), Size::new(100.0, 100.0), 0.5);
        let via_parent = parent.make_child(Point::new(8.0, 4.0), Size::new(1.0, 1.0), 3.0);

        // Same placement expressed directly against the grandparent.
        let combined_offset = Point::new(20.0, 30.0) + Point::new(8.0, 4.0) * 0.5;
        let direct = root.make_child(combined_offset, Size::new(1.0, 1.0), 0.5 * 3.0);

        assert!(approx(via_parent.absolute_position(), direct.absolute_position()));
        assert!((via_parent.scale() - direct.scale()).abs() < 1e-6);
    }

    #[test]
    fn absolute_to_local_round_trips() {
        let root = Geometry::root(Size::new(500.0, 500.0), 2.0);
        let child = root.make_child(Point::new(10.0, 20.0), Size::new(50.0, 50.0), 0.5);

        let local = Point::new(3.0, 7.0);
        let absolute = child.local_to_absolute(local);
        assert!(approx(child.absolute_to_local(absolute), local));
    }

    #[test]
    fn zero_scale_absolute_to_local_is_origin() {
        let root = Geometry::root(Size::new(10.0, 10.0), 0.0);
        assert_eq!(root.absolute_to_local(Point::new(4.0, 4.0)), Point::ORIGIN);
    }

    #[test]
    fn render_transform_does_not_move_layout() {
        let root = Geometry::root(Size::new(100.0, 100.0), 1.0);
        let child = root.make_child_with_render_transform(
            Point::new(10.0, 10.0),
            Size::new(20.0, 20.0),
            1.0,
            LayoutTransform::from_scale(2.0),
            Point::new(0.5, 0.5),
        );

        assert_eq!(child.layout_bounding_rect(), Rect::new(10.0, 10.0, 20.0, 20.0));
        // Scaled 2x about its center: grows 10px in every direction.
        let render = child.render_bounding_rect();
        assert!((render.x - 0.0).abs() < 1e-4);
        assert!((render.width - 40.0).abs() < 1e-4);
        assert!(child.is_under_location(Point::new(2.0, 2.0)));
    }
}
