//! Rendering: draws the note graph to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads the layout and the hovered node id and produces pixels; it does
//! not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{LABEL_MAX_CHARS, LABEL_OFFSET_PX};
use crate::layout::{GraphNode, Layout};

const EDGE_COLOR: &str = "#506256";
const EDGE_WIDTH: f64 = 1.0;
const NODE_BORDER_WIDTH: f64 = 2.0;

/// Colors and font for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub label: &'static str,
    pub font: &'static str,
}

const NORMAL: NodeStyle = NodeStyle {
    fill: "#315C62",
    stroke: "#09232A",
    label: "#A79385",
    font: "10px sans-serif",
};

const HOVERED: NodeStyle = NodeStyle {
    fill: "#C8A92A",
    stroke: "#F0DED3",
    label: "#F0DED3",
    font: "bold 12px sans-serif",
};

#[must_use]
pub fn node_style(hovered: bool) -> NodeStyle {
    if hovered { HOVERED } else { NORMAL }
}

/// Title cut to the label length, with `...` when anything was cut.
#[must_use]
pub fn truncate_label(title: &str) -> String {
    match title.char_indices().nth(LABEL_MAX_CHARS) {
        Some((end, _)) => format!("{}...", &title[..end]),
        None => title.to_owned(),
    }
}

/// Draw edges under nodes, then each node with its label.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, layout: &Layout, hovered: Option<&str>) -> Result<(), JsValue> {
    let (width, height) = layout.size();
    ctx.clear_rect(0.0, 0.0, width, height);

    ctx.set_stroke_style_str(EDGE_COLOR);
    ctx.set_line_width(EDGE_WIDTH);
    for (a, b) in layout.link_segments() {
        ctx.begin_path();
        ctx.move_to(a.x, a.y);
        ctx.line_to(b.x, b.y);
        ctx.stroke();
    }

    for node in layout.nodes() {
        draw_node(ctx, node, node_style(hovered == Some(node.id.as_str())))?;
    }

    Ok(())
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &GraphNode, style: NodeStyle) -> Result<(), JsValue> {
    let p = node.position;

    ctx.begin_path();
    ctx.arc(p.x, p.y, node.radius, 0.0, TAU)?;
    ctx.set_fill_style_str(style.fill);
    ctx.fill();
    ctx.set_stroke_style_str(style.stroke);
    ctx.set_line_width(NODE_BORDER_WIDTH);
    ctx.stroke();

    ctx.set_fill_style_str(style.label);
    ctx.set_font(style.font);
    ctx.set_text_align("center");
    ctx.fill_text(&truncate_label(&node.title), p.x, p.y + node.radius + LABEL_OFFSET_PX)
}
