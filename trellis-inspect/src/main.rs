//! trellis-inspect - lay out a JSON blueprint and print the result.
//!
//! Loads a widget tree, runs the prepass and the arrangement for a viewport
//! and prints every arranged widget with its absolute geometry, indented by
//! depth. `RUST_LOG=trellis=trace` shows the per-widget pass events.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use trellis::{Blueprint, Geometry, LayoutContext, Point, Size, VisibilityFilter};

#[derive(Parser)]
#[command(name = "trellis-inspect")]
#[command(about = "Arrange a widget blueprint and print the geometry tree", long_about = None)]
struct Args {
    /// Blueprint JSON file
    path: PathBuf,

    /// Viewport width
    #[arg(short = 'W', long, default_value = "800")]
    width: f32,

    /// Viewport height
    #[arg(short = 'H', long, default_value = "600")]
    height: f32,

    /// Root layout scale
    #[arg(short, long, default_value = "1.0")]
    scale: f32,

    /// Which widgets to include
    #[arg(short, long, value_enum, default_value = "layout")]
    filter: Filter,

    /// Also report the widget path under this point, as `x,y`
    #[arg(long, value_parser = parse_point)]
    hit: Option<Point>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Filter {
    /// Visible and hidden widgets
    Layout,
    /// Painted widgets only
    Paint,
    /// Widgets that take pointer hits, or whose children do
    HitTest,
}

impl Filter {
    fn mask(self) -> VisibilityFilter {
        match self {
            Filter::Layout => VisibilityFilter::LAYOUT,
            Filter::Paint => VisibilityFilter::PAINT,
            // Keep self-invisible containers so their hit-testable children show.
            Filter::HitTest => VisibilityFilter::SELF_HIT_TEST | VisibilityFilter::CHILDREN_HIT_TEST,
        }
    }
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let x = x.trim().parse::<f32>().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse::<f32>().map_err(|e| format!("bad y: {e}"))?;
    Ok(Point::new(x, y))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if !(args.scale.is_finite() && args.scale > 0.0) {
        anyhow::bail!("Scale must be positive, got {}", args.scale);
    }

    let json = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read '{}'", args.path.display()))?;
    let blueprint = Blueprint::from_json(&json)
        .with_context(|| format!("Failed to parse '{}'", args.path.display()))?;
    let root = blueprint.build().context("Invalid blueprint")?;

    let mut ctx = LayoutContext::new();
    let desired = ctx.prepass(&root, args.scale);
    let stats = ctx.stats();
    tracing::info!(hits = stats.hits, misses = stats.misses, "prepass");

    let geometry = Geometry::root(Size::new(args.width, args.height), args.scale);
    let nodes = ctx.arrange_tree(&root, &geometry, args.filter.mask());

    println!(
        "desired {}x{}  viewport {}x{} @ {}",
        desired.width, desired.height, args.width, args.height, args.scale
    );
    for node in &nodes {
        let position = node.entry.geometry.absolute_position();
        let size = node.entry.geometry.absolute_size();
        println!(
            "{:indent$}{}  ({}, {})  {}x{}",
            "",
            node.entry.widget.borrow().debug_label(),
            position.x,
            position.y,
            size.width,
            size.height,
            indent = node.depth * 2
        );
    }

    if let Some(point) = args.hit {
        let path = ctx.hit_test(&root, &geometry, point);
        let labels: Vec<String> = path.iter().map(|widget| widget.borrow().debug_label()).collect();
        if labels.is_empty() {
            println!("hit ({}, {}): nothing", point.x, point.y);
        } else {
            println!("hit ({}, {}): {}", point.x, point.y, labels.join(" > "));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis::Visibility;

    #[test]
    fn hit_test_filter_keeps_self_invisible_containers() {
        let mask = Filter::HitTest.mask();
        assert!(mask.intersects(Visibility::Visible.bits()));
        assert!(mask.intersects(Visibility::SelfHitTestInvisible.bits()));
        assert!(!mask.intersects(Visibility::HitTestInvisible.bits()));
        assert!(!mask.intersects(Visibility::Hidden.bits()));
    }

    #[test]
    fn points_parse_from_pairs() {
        assert_eq!(parse_point("3, 4.5"), Ok(Point::new(3.0, 4.5)));
        assert!(parse_point("3").is_err());
    }
}
