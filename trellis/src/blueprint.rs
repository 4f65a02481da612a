//! Declarative widget trees.
//!
//! A `Blueprint` is a serde description of a widget tree, normally loaded
//! from JSON. Each node names its widget type in a `type` field and carries
//! that type's attributes plus a list of slots. `build()` validates the whole
//! tree and produces live widgets.
//!
//! ```json
//! {
//!   "type": "box",
//!   "orientation": "horizontal",
//!   "slots": [
//!     { "size": "auto", "widget": { "type": "spacer", "width": 50, "height": 10 } },
//!     { "size": { "stretch": 2 }, "widget": { "type": "spacer", "name": "main" } }
//!   ]
//! }
//! ```
//!
//! Weak hosts refer to another node of the same tree by `name`; those
//! references are resolved after the whole tree exists.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::children::SlotLayout;
use crate::layout::length::{Align, Padding, SizeParam};
use crate::panels::{
    Border, BoxPanel, BoxSlot, GridPanel, GridSlot, Overlay, OverlaySlot, ResizeMode, ResponsiveGridPanel,
    ResponsiveLayout, ResponsiveSlot, Scaler, SizeRule, Splitter, SplitterSlot, SwitcherSlot, UniformGridPanel,
    UniformGridSlot, WeakHost, WidgetSwitcher, WrapBox, WrapSlot, DEFAULT_HIT_DETECTION_HANDLE_SIZE,
    DEFAULT_MIN_CHILD_LENGTH, DEFAULT_PHYSICAL_HANDLE_SIZE, DEFAULT_PREFERRED_WIDTH, DEFAULT_TOTAL_COLUMNS,
};
use crate::primitives::{Orientation, Point, Size};
use crate::visibility::Visibility;
use crate::widget::{WidgetExt, WidgetRef};
use crate::widgets::Spacer;

#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("grid slot at ({column}, {row}) has a zero span")]
    ZeroSpan { column: usize, row: usize },

    #[error("stretch coefficient must be finite and non-negative, got {0}")]
    NegativeStretch(f32),

    #[error("responsive grid needs at least one column")]
    ZeroColumns,

    #[error("switcher active index {index} out of range for {len} slots")]
    SwitcherIndexOutOfRange { index: usize, len: usize },

    #[error("scale must be positive, got {0}")]
    InvalidScale(f32),

    #[error("unknown widget: {0}")]
    UnknownWidget(String),

    #[error("duplicate widget name: {0}")]
    DuplicateName(String),
}

// =========================================================================
// Nodes
// =========================================================================

/// One node of a declarative widget tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    /// Debug tag, also the key weak hosts refer to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(flatten)]
    pub widget: WidgetKind,
}

/// Widget type and its attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetKind {
    Spacer {
        #[serde(default)]
        width: f32,
        #[serde(default)]
        height: f32,
    },
    #[serde(rename = "box")]
    BoxPanel {
        #[serde(default)]
        orientation: Orientation,
        #[serde(default)]
        slots: Vec<BoxSlotDesc>,
    },
    Grid {
        /// Fill coefficient per column index.
        #[serde(default)]
        column_fill: Vec<f32>,
        /// Fill coefficient per row index.
        #[serde(default)]
        row_fill: Vec<f32>,
        #[serde(default)]
        slots: Vec<GridSlotDesc>,
    },
    UniformGrid {
        #[serde(default)]
        slot_padding: Padding,
        #[serde(default)]
        min_slot_width: f32,
        #[serde(default)]
        min_slot_height: f32,
        #[serde(default)]
        slots: Vec<UniformGridSlotDesc>,
    },
    Wrap {
        #[serde(default = "default_preferred_width")]
        preferred_width: f32,
        #[serde(default)]
        inner_slot_padding: Size,
        #[serde(default)]
        use_allotted_width: bool,
        #[serde(default)]
        slots: Vec<WrapSlotDesc>,
    },
    Splitter {
        #[serde(default)]
        orientation: Orientation,
        #[serde(default)]
        resize_mode: ResizeMode,
        #[serde(default = "default_physical_handle_size")]
        physical_handle_size: f32,
        #[serde(default = "default_hit_detection_handle_size")]
        hit_detection_handle_size: f32,
        #[serde(default = "default_min_child_length")]
        min_child_length: f32,
        #[serde(default)]
        slots: Vec<SplitterSlotDesc>,
    },
    ResponsiveGrid {
        #[serde(default = "default_total_columns")]
        total_columns: usize,
        #[serde(default)]
        column_gutter: f32,
        #[serde(default)]
        row_gutter: f32,
        #[serde(default)]
        row_fill: Vec<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        measure_width: Option<f32>,
        #[serde(default)]
        slots: Vec<ResponsiveSlotDesc>,
    },
    Border {
        #[serde(default)]
        padding: Padding,
        #[serde(default)]
        h_align: Align,
        #[serde(default)]
        v_align: Align,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width_override: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height_override: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_desired_width: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_desired_width: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_desired_height: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_desired_height: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<Box<Blueprint>>,
    },
    Overlay {
        #[serde(default)]
        slots: Vec<OverlaySlotDesc>,
    },
    Scaler {
        scale: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<Box<Blueprint>>,
    },
    Switcher {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        active: Option<usize>,
        #[serde(default)]
        slots: Vec<SwitcherSlotDesc>,
    },
    WeakHost {
        /// Name of the hosted node.
        target: String,
    },
}

fn default_preferred_width() -> f32 {
    DEFAULT_PREFERRED_WIDTH
}

fn default_physical_handle_size() -> f32 {
    DEFAULT_PHYSICAL_HANDLE_SIZE
}

fn default_hit_detection_handle_size() -> f32 {
    DEFAULT_HIT_DETECTION_HANDLE_SIZE
}

fn default_min_child_length() -> f32 {
    DEFAULT_MIN_CHILD_LENGTH
}

fn default_total_columns() -> usize {
    DEFAULT_TOTAL_COLUMNS
}

fn default_span() -> usize {
    1
}

fn default_value() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

// =========================================================================
// Slots
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxSlotDesc {
    pub widget: Blueprint,
    #[serde(flatten)]
    pub layout: SlotLayout,
    #[serde(default)]
    pub size: SizeParam,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSlotDesc {
    pub widget: Blueprint,
    #[serde(flatten)]
    pub layout: SlotLayout,
    #[serde(default)]
    pub column: usize,
    #[serde(default)]
    pub row: usize,
    #[serde(default = "default_span")]
    pub column_span: usize,
    #[serde(default = "default_span")]
    pub row_span: usize,
    #[serde(default)]
    pub layer: i32,
    #[serde(default)]
    pub nudge: Point,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniformGridSlotDesc {
    pub widget: Blueprint,
    #[serde(flatten)]
    pub layout: SlotLayout,
    #[serde(default)]
    pub column: usize,
    #[serde(default)]
    pub row: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrapSlotDesc {
    pub widget: Blueprint,
    #[serde(flatten)]
    pub layout: SlotLayout,
    #[serde(default)]
    pub fill_empty_space: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_line_when_width_less_than: Option<f32>,
    #[serde(default)]
    pub force_new_line: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterSlotDesc {
    pub widget: Blueprint,
    #[serde(flatten)]
    pub layout: SlotLayout,
    #[serde(default)]
    pub size_rule: SizeRule,
    #[serde(default = "default_value")]
    pub value: f32,
    #[serde(default)]
    pub min_size: f32,
    #[serde(default = "default_true")]
    pub resizable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsiveSlotDesc {
    pub widget: Blueprint,
    #[serde(flatten)]
    pub layout: SlotLayout,
    #[serde(default)]
    pub layouts: Vec<ResponsiveLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySlotDesc {
    pub widget: Blueprint,
    #[serde(flatten)]
    pub layout: SlotLayout,
    #[serde(default)]
    pub z_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitcherSlotDesc {
    pub widget: Blueprint,
    #[serde(flatten)]
    pub layout: SlotLayout,
}

// =========================================================================
// Building
// =========================================================================

/// Named nodes and unresolved weak host references collected during a build.
#[derive(Default)]
struct BuildContext {
    named: HashMap<String, WidgetRef>,
    weak_hosts: Vec<(Rc<RefCell<WeakHost>>, String)>,
}

fn check_stretch(coefficient: f32) -> Result<(), BlueprintError> {
    if !(coefficient >= 0.0 && coefficient.is_finite()) {
        return Err(BlueprintError::NegativeStretch(coefficient));
    }
    Ok(())
}

impl Blueprint {
    /// Parse a blueprint from JSON text.
    pub fn from_json(json: &str) -> Result<Self, BlueprintError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BlueprintError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A bare node of the given type.
    pub fn new(widget: WidgetKind) -> Self {
        Self {
            name: None,
            visibility: Visibility::default(),
            widget,
        }
    }

    /// Validate the tree and build live widgets. Returns the root.
    pub fn build(&self) -> Result<WidgetRef, BlueprintError> {
        let mut cx = BuildContext::default();
        let root = self.build_node(&mut cx)?;

        for (host, target) in cx.weak_hosts {
            let widget = cx
                .named
                .get(&target)
                .ok_or_else(|| BlueprintError::UnknownWidget(target.clone()))?;
            host.borrow_mut().set_target(widget);
        }

        tracing::debug!(named = cx.named.len(), "blueprint built");
        Ok(root)
    }

    fn build_node(&self, cx: &mut BuildContext) -> Result<WidgetRef, BlueprintError> {
        let widget: WidgetRef = match &self.widget {
            WidgetKind::Spacer { width, height } => Spacer::new(*width, *height).into_ref(),

            WidgetKind::BoxPanel { orientation, slots } => {
                let mut panel = BoxPanel::new(*orientation);
                for desc in slots {
                    check_stretch(desc.size.coefficient())?;
                    let mut slot = BoxSlot::new(desc.widget.build_node(cx)?)
                        .size_param(desc.size)
                        .slot_layout(desc.layout);
                    if let Some(max) = desc.max_size {
                        slot = slot.max_size(max);
                    }
                    panel = panel.slot(slot);
                }
                panel.into_ref()
            }

            WidgetKind::Grid {
                column_fill,
                row_fill,
                slots,
            } => {
                let mut panel = GridPanel::new();
                for (column, coefficient) in column_fill.iter().enumerate() {
                    check_stretch(*coefficient)?;
                    panel = panel.fill_column(column, *coefficient);
                }
                for (row, coefficient) in row_fill.iter().enumerate() {
                    check_stretch(*coefficient)?;
                    panel = panel.fill_row(row, *coefficient);
                }
                for desc in slots {
                    if desc.column_span == 0 || desc.row_span == 0 {
                        return Err(BlueprintError::ZeroSpan {
                            column: desc.column,
                            row: desc.row,
                        });
                    }
                    let slot = GridSlot::new(desc.widget.build_node(cx)?, desc.column, desc.row)
                        .column_span(desc.column_span)
                        .row_span(desc.row_span)
                        .layer(desc.layer)
                        .nudge(desc.nudge)
                        .slot_layout(desc.layout);
                    panel.add_slot(slot);
                }
                panel.into_ref()
            }

            WidgetKind::UniformGrid {
                slot_padding,
                min_slot_width,
                min_slot_height,
                slots,
            } => {
                let mut panel = UniformGridPanel::new()
                    .slot_padding(*slot_padding)
                    .min_desired_slot_width(*min_slot_width)
                    .min_desired_slot_height(*min_slot_height);
                for desc in slots {
                    let slot = UniformGridSlot::new(desc.widget.build_node(cx)?, desc.column, desc.row)
                        .slot_layout(desc.layout);
                    panel = panel.slot(slot);
                }
                panel.into_ref()
            }

            WidgetKind::Wrap {
                preferred_width,
                inner_slot_padding,
                use_allotted_width,
                slots,
            } => {
                let mut panel = WrapBox::new()
                    .preferred_width(*preferred_width)
                    .inner_slot_padding(*inner_slot_padding)
                    .use_allotted_width(*use_allotted_width);
                for desc in slots {
                    let mut slot = WrapSlot::new(desc.widget.build_node(cx)?)
                        .fill_empty_space(desc.fill_empty_space)
                        .force_new_line(desc.force_new_line)
                        .slot_layout(desc.layout);
                    if let Some(threshold) = desc.fill_line_when_width_less_than {
                        slot = slot.fill_line_when_width_less_than(threshold);
                    }
                    panel = panel.slot(slot);
                }
                panel.into_ref()
            }

            WidgetKind::Splitter {
                orientation,
                resize_mode,
                physical_handle_size,
                hit_detection_handle_size,
                min_child_length,
                slots,
            } => {
                let mut panel = Splitter::new(*orientation)
                    .resize_mode(*resize_mode)
                    .physical_handle_size(*physical_handle_size)
                    .hit_detection_handle_size(*hit_detection_handle_size)
                    .min_child_length(*min_child_length);
                for desc in slots {
                    check_stretch(desc.value)?;
                    let slot = SplitterSlot::new(desc.widget.build_node(cx)?)
                        .size_rule(desc.size_rule)
                        .value(desc.value)
                        .min_size(desc.min_size)
                        .resizable(desc.resizable)
                        .slot_layout(desc.layout);
                    panel = panel.slot(slot);
                }
                panel.into_ref()
            }

            WidgetKind::ResponsiveGrid {
                total_columns,
                column_gutter,
                row_gutter,
                row_fill,
                measure_width,
                slots,
            } => {
                if *total_columns == 0 {
                    return Err(BlueprintError::ZeroColumns);
                }
                let mut panel = ResponsiveGridPanel::new(*total_columns)
                    .column_gutter(*column_gutter)
                    .row_gutter(*row_gutter);
                if let Some(width) = measure_width {
                    panel = panel.measure_width(*width);
                }
                for (row, coefficient) in row_fill.iter().enumerate() {
                    check_stretch(*coefficient)?;
                    panel = panel.fill_row(row, *coefficient);
                }
                for desc in slots {
                    let mut slot = ResponsiveSlot::new(desc.widget.build_node(cx)?).slot_layout(desc.layout);
                    for layout in &desc.layouts {
                        slot.add_layout(*layout);
                    }
                    panel = panel.slot(slot);
                }
                panel.into_ref()
            }

            WidgetKind::Border {
                padding,
                h_align,
                v_align,
                width_override,
                height_override,
                min_desired_width,
                max_desired_width,
                min_desired_height,
                max_desired_height,
                content,
            } => {
                let mut border = Border::new().padding(*padding).h_align(*h_align).v_align(*v_align);
                if let Some(width) = width_override {
                    border = border.width_override(*width);
                }
                if let Some(height) = height_override {
                    border = border.height_override(*height);
                }
                if let Some(width) = min_desired_width {
                    border = border.min_desired_width(*width);
                }
                if let Some(width) = max_desired_width {
                    border = border.max_desired_width(*width);
                }
                if let Some(height) = min_desired_height {
                    border = border.min_desired_height(*height);
                }
                if let Some(height) = max_desired_height {
                    border = border.max_desired_height(*height);
                }
                if let Some(content) = content {
                    border = border.content(content.build_node(cx)?);
                }
                border.into_ref()
            }

            WidgetKind::Overlay { slots } => {
                let mut panel = Overlay::new();
                for desc in slots {
                    let slot = OverlaySlot::new(desc.widget.build_node(cx)?)
                        .z_order(desc.z_order)
                        .slot_layout(desc.layout);
                    panel = panel.slot(slot);
                }
                panel.into_ref()
            }

            WidgetKind::Scaler { scale, content } => {
                if !(scale.is_finite() && *scale > 0.0) {
                    return Err(BlueprintError::InvalidScale(*scale));
                }
                let mut scaler = Scaler::new(*scale);
                if let Some(content) = content {
                    scaler = scaler.content(content.build_node(cx)?);
                }
                scaler.into_ref()
            }

            WidgetKind::Switcher { active, slots } => {
                let mut panel = WidgetSwitcher::new();
                for desc in slots {
                    panel = panel.slot(SwitcherSlot::new(desc.widget.build_node(cx)?).slot_layout(desc.layout));
                }
                if let Some(index) = *active {
                    if !panel.set_active_index(index) {
                        return Err(BlueprintError::SwitcherIndexOutOfRange {
                            index,
                            len: slots.len(),
                        });
                    }
                }
                panel.into_ref()
            }

            WidgetKind::WeakHost { target } => {
                let host = WeakHost::new().into_shared();
                cx.weak_hosts.push((Rc::clone(&host), target.clone()));
                host
            }
        };

        {
            let mut node = widget.borrow_mut();
            node.set_visibility(self.visibility);
            if let Some(name) = &self.name {
                node.base_mut().set_tag(name.clone());
            }
        }

        if let Some(name) = &self.name {
            if cx.named.insert(name.clone(), Rc::clone(&widget)).is_some() {
                return Err(BlueprintError::DuplicateName(name.clone()));
            }
        }

        Ok(widget)
    }
}
