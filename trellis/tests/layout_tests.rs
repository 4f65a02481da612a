//! Integration tests for whole-tree layout.
//!
//! These build trees through the public API, run the prepass and the
//! arrangement exactly as a painter would, and check the numeric contracts
//! every layout algorithm has to honor.

use std::cell::RefCell;
use std::rc::Rc;

use trellis::{
    arrange_children_of, Border, BoxPanel, BoxSlot, Geometry, GridPanel, GridSlot, LayoutContext, Orientation,
    Padding, Point, ResizeMode, ResponsiveGridPanel, ResponsiveSlot, Scaler, Size, Spacer, Splitter, SplitterSlot,
    Visibility, VisibilityFilter, WidgetExt, WidgetRef, WrapBox, WrapSlot,
};

const EPSILON: f32 = 0.01;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn leaf(width: f32, height: f32) -> WidgetRef {
    Spacer::new(width, height).into_ref()
}

fn collapsed_leaf() -> WidgetRef {
    Spacer::new(500.0, 500.0)
        .with_visibility(Visibility::Collapsed)
        .into_ref()
}

/// Prepass, then arrange the direct children of `root` at `size`.
fn layout(root: &WidgetRef, size: Size) -> trellis::ArrangedChildren {
    LayoutContext::new().prepass(root, 1.0);
    arrange_children_of(root, &Geometry::root(size, 1.0), VisibilityFilter::LAYOUT)
}

#[test]
fn box_auto_and_stretch_end_to_end() {
    let root = BoxPanel::horizontal()
        .slot(BoxSlot::new(leaf(50.0, 10.0)).auto_size())
        .slot(BoxSlot::new(leaf(10.0, 10.0)).stretch(1.0))
        .slot(BoxSlot::new(leaf(10.0, 10.0)).stretch(2.0))
        .into_ref();

    let arranged = layout(&root, Size::new(300.0, 40.0));
    let lengths: Vec<f32> = arranged.iter().map(|a| a.geometry.size.width).collect();
    let offsets: Vec<f32> = arranged.iter().map(|a| a.geometry.position.x).collect();

    for (actual, expected) in lengths.iter().zip([50.0, 83.33, 166.67]) {
        assert!(approx(*actual, expected), "length {actual} != {expected}");
    }
    for (actual, expected) in offsets.iter().zip([0.0, 50.0, 133.33]) {
        assert!(approx(*actual, expected), "offset {actual} != {expected}");
    }
}

#[test]
fn box_stretch_fills_available_length() {
    let cases: [(&[f32], &[f32], f32); 4] = [
        (&[1.0], &[], 100.0),
        (&[1.0, 1.0, 1.0], &[40.0], 250.0),
        (&[0.5, 3.0], &[10.0, 20.0], 97.0),
        (&[2.0, 0.25, 7.0], &[0.0, 33.3], 1000.0),
    ];

    for (coefficients, fixed, available) in cases {
        let mut panel = BoxPanel::vertical();
        for length in fixed {
            panel.add_slot(BoxSlot::new(leaf(5.0, *length)).auto_size());
        }
        for coefficient in coefficients {
            panel.add_slot(BoxSlot::new(leaf(5.0, 1.0)).stretch(*coefficient));
        }
        let root = panel.into_ref();

        let arranged = layout(&root, Size::new(10.0, available));
        let total: f32 = arranged.iter().map(|a| a.geometry.size.height).sum();
        assert!(approx(total, available), "{total} != {available}");
    }
}

#[test]
fn grid_span_reads_partial_sums() {
    let spanning = leaf(10.0, 10.0);
    let grid = GridPanel::new()
        .fill_column(0, 1.0)
        .fill_column(1, 2.0)
        .slot(GridSlot::new(leaf(30.0, 10.0), 2, 0))
        .slot(GridSlot::new(spanning.clone(), 0, 1).column_span(2))
        .into_shared();
    let root: WidgetRef = grid.clone();

    let arranged = layout(&root, Size::new(330.0, 100.0));
    let offsets = grid.borrow().track_offsets(Orientation::Horizontal, 330.0);
    let geometry = arranged.find(&spanning).map(|a| a.geometry);

    assert_eq!(offsets.len(), 4);
    assert_eq!(geometry.map(|g| g.size.width), Some(offsets[2] - offsets[0]));
    assert_eq!(geometry.map(|g| g.position.x), Some(offsets[0]));
    assert!(approx(offsets[3], 330.0));
}

#[test]
fn wrap_never_overflows_preferred_width() {
    let preferred = 100.0;
    let mut wrap = WrapBox::new().preferred_width(preferred);
    for width in [30.0, 40.0, 50.0, 20.0, 60.0, 99.0, 1.0, 45.0] {
        wrap.add_slot(WrapSlot::new(leaf(width, 10.0)));
    }
    let root = wrap.into_ref();

    let arranged = layout(&root, Size::new(500.0, 500.0));
    assert_eq!(arranged.len(), 8);
    for entry in arranged.iter() {
        let right = entry.geometry.position.x + entry.geometry.size.width;
        assert!(right <= preferred + EPSILON, "child ends at {right}");
    }
}

#[test]
fn wrap_places_oversized_child_alone() {
    let wide = leaf(150.0, 10.0);
    let root = WrapBox::new()
        .preferred_width(100.0)
        .slot(WrapSlot::new(leaf(30.0, 10.0)))
        .slot(WrapSlot::new(wide.clone()))
        .slot(WrapSlot::new(leaf(30.0, 10.0)))
        .into_ref();

    let arranged = layout(&root, Size::new(500.0, 500.0));
    let ys: Vec<f32> = arranged.iter().map(|a| a.geometry.position.y).collect();
    assert_eq!(ys, vec![0.0, 10.0, 20.0]);

    let geometry = arranged.find(&wide).map(|a| a.geometry);
    assert_eq!(geometry.map(|g| g.position.x), Some(0.0));
    assert_eq!(geometry.map(|g| g.size.width), Some(150.0));
}

#[test]
fn splitter_drags_preserve_coefficient_total() {
    let splitter = Splitter::horizontal()
        .resize_mode(ResizeMode::Fill)
        .slot(SplitterSlot::new(leaf(10.0, 10.0)).value(1.0))
        .slot(SplitterSlot::new(leaf(10.0, 10.0)).value(0.5))
        .slot(SplitterSlot::new(leaf(10.0, 10.0)).value(1.5))
        .slot(SplitterSlot::new(leaf(10.0, 10.0)).value(1.0))
        .into_shared();
    let root: WidgetRef = splitter.clone();
    LayoutContext::new().prepass(&root, 1.0);

    let allotted = Size::new(415.0, 50.0);
    let before: f32 = splitter.borrow().values().iter().sum();

    for (handle, delta) in [(0, 50.0), (1, -400.0), (2, 300.0), (0, -1000.0), (1, 35.5), (2, -12.25)] {
        splitter.borrow_mut().resize_handle(handle, delta, allotted);
        let after: f32 = splitter.borrow().values().iter().sum();
        assert!((after - before).abs() < 1e-3, "total drifted to {after} after {delta} on {handle}");
    }

    let lengths = splitter.borrow().child_lengths(allotted);
    assert!(lengths.iter().all(|length| *length >= 20.0 - EPSILON), "{lengths:?}");
}

#[test]
fn collapsed_children_are_excluded_everywhere() {
    let size = Size::new(200.0, 200.0);
    let visible = Size::new(10.0, 10.0);

    let trees: Vec<(&str, WidgetRef, WidgetRef)> = {
        let mut trees = Vec::new();

        let hidden = collapsed_leaf();
        let root = BoxPanel::horizontal()
            .slot(BoxSlot::new(hidden.clone()).auto_size())
            .slot(BoxSlot::new(leaf(10.0, 10.0)).auto_size())
            .into_ref();
        trees.push(("box", root, hidden));

        let hidden = collapsed_leaf();
        let root = GridPanel::new()
            .slot(GridSlot::new(leaf(10.0, 10.0), 0, 0))
            .slot(GridSlot::new(hidden.clone(), 1, 1))
            .into_ref();
        trees.push(("grid", root, hidden));

        let hidden = collapsed_leaf();
        let root = WrapBox::new()
            .slot(WrapSlot::new(hidden.clone()))
            .slot(WrapSlot::new(leaf(10.0, 10.0)))
            .into_ref();
        trees.push(("wrap", root, hidden));

        let hidden = collapsed_leaf();
        let root = Splitter::horizontal()
            .slot(SplitterSlot::new(leaf(10.0, 10.0)))
            .slot(SplitterSlot::new(hidden.clone()))
            .into_ref();
        trees.push(("splitter", root, hidden));

        let hidden = collapsed_leaf();
        let root = ResponsiveGridPanel::new(12)
            .slot(ResponsiveSlot::new(hidden.clone()))
            .slot(ResponsiveSlot::new(leaf(10.0, 10.0)))
            .into_ref();
        trees.push(("responsive", root, hidden));

        trees
    };

    for (name, root, hidden) in trees {
        let desired = LayoutContext::new().prepass(&root, 1.0);
        assert_eq!(desired, visible, "{name} desired size");
        assert_eq!(hidden.borrow().desired_size(), Size::ZERO, "{name} hidden size");

        let arranged = arrange_children_of(&root, &Geometry::root(size, 1.0), VisibilityFilter::LAYOUT);
        assert_eq!(arranged.len(), 1, "{name} arranged count");
        assert!(arranged.find(&hidden).is_none(), "{name} arranged the collapsed child");
    }
}

#[test]
fn nested_transforms_compose() {
    let inner = leaf(10.0, 10.0);
    let root = BoxPanel::horizontal()
        .slot(BoxSlot::new(leaf(40.0, 10.0)).auto_size())
        .slot(BoxSlot::new(
            Border::new()
                .padding(Padding::new(3.0, 0.0, 0.0, 5.0))
                .content(Scaler::new(2.0).content(inner.clone()).into_ref())
                .into_ref(),
        ))
        .into_ref();

    let mut ctx = LayoutContext::new();
    ctx.prepass(&root, 1.0);
    let root_geometry = Geometry::root(Size::new(200.0, 100.0), 1.0);
    let nodes = ctx.arrange_tree(&root, &root_geometry, VisibilityFilter::LAYOUT);

    let leaf_node = nodes
        .iter()
        .find(|node| node.entry.is(&inner))
        .map(|node| node.entry.geometry);
    let Some(geometry) = leaf_node else {
        panic!("inner leaf was not arranged");
    };

    // Box offset 40, border padding (5, 3), scaler origin, scale 2.
    assert_eq!(geometry.absolute_position(), Point::new(45.0, 3.0));
    assert_eq!(geometry.scale(), 2.0);
    assert_eq!(geometry.local_to_absolute(Point::new(10.0, 10.0)), Point::new(65.0, 23.0));
    assert_eq!(geometry.absolute_to_local(Point::new(65.0, 23.0)), Point::new(10.0, 10.0));

    // Same result when the grandchild is derived from the root in one step.
    let direct = root_geometry.make_child(Point::new(45.0, 3.0), geometry.size, 2.0);
    assert_eq!(direct.absolute_position(), geometry.absolute_position());
    assert_eq!(direct.absolute_size(), geometry.absolute_size());
}

#[test]
fn hidden_child_keeps_its_space() {
    let hidden = Spacer::new(30.0, 10.0)
        .with_visibility(Visibility::Hidden)
        .into_ref();
    let after = leaf(20.0, 10.0);
    let root = BoxPanel::horizontal()
        .slot(BoxSlot::new(hidden.clone()).auto_size())
        .slot(BoxSlot::new(after.clone()).auto_size())
        .into_ref();

    LayoutContext::new().prepass(&root, 1.0);
    let geometry = Geometry::root(Size::new(100.0, 10.0), 1.0);

    let painted = arrange_children_of(&root, &geometry, VisibilityFilter::PAINT);
    assert!(painted.find(&hidden).is_none());
    assert_eq!(painted.find(&after).map(|a| a.geometry.position.x), Some(30.0));

    let laid_out = arrange_children_of(&root, &geometry, VisibilityFilter::LAYOUT);
    assert_eq!(laid_out.len(), 2);
}

#[test]
fn mutation_between_passes_is_picked_up() {
    let resizable = Rc::new(RefCell::new(Spacer::new(10.0, 10.0)));
    let child: WidgetRef = resizable.clone();
    let root = BoxPanel::horizontal()
        .slot(BoxSlot::new(child).auto_size())
        .slot(BoxSlot::new(leaf(10.0, 10.0)).auto_size())
        .into_ref();

    let mut ctx = LayoutContext::new();
    assert_eq!(ctx.prepass(&root, 1.0), Size::new(20.0, 10.0));

    resizable.borrow_mut().set_size(Size::new(25.0, 40.0));
    assert_eq!(ctx.prepass(&root, 1.0), Size::new(35.0, 40.0));
    // The untouched sibling was served from its cache.
    assert_eq!(ctx.stats().hits, 1);
}
