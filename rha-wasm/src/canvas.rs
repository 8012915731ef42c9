use rha_core::Point;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

use crate::utils::to_screen;

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

fn trace(ctx: &CanvasRenderingContext2d, pts: &[Point], scale: f64, offset: (f64, f64)) {
    ctx.begin_path();
    let (sx, sy) = to_screen(pts[0], scale, offset);
    ctx.move_to(sx, sy);
    for p in &pts[1..] {
        let (x, y) = to_screen(*p, scale, offset);
        ctx.line_to(x, y);
    }
}

/// Stroke an open point sequence (angle markers, arcs).
pub fn draw_polyline(
    ctx: &CanvasRenderingContext2d,
    pts: &[Point],
    scale: f64,
    offset: (f64, f64),
    color: &str,
    width: f64,
) {
    if pts.len() < 2 {
        return;
    }
    trace(ctx, pts, scale, offset);
    ctx.set_line_width(width);
    set_stroke_style(ctx, color);
    ctx.stroke();
}

/// Fill and stroke a closed polygon.
pub fn draw_polygon(
    ctx: &CanvasRenderingContext2d,
    pts: &[Point],
    scale: f64,
    offset: (f64, f64),
    fill: &str,
    stroke: &str,
) {
    if pts.is_empty() {
        return;
    }
    trace(ctx, pts, scale, offset);
    ctx.close_path();
    ctx.set_line_width(2.0);
    set_fill_style(ctx, fill);
    ctx.fill();
    set_stroke_style(ctx, stroke);
    ctx.stroke();
}

pub fn draw_segment(
    ctx: &CanvasRenderingContext2d,
    a: Point,
    b: Point,
    scale: f64,
    offset: (f64, f64),
    color: &str,
    width: f64,
) {
    draw_polyline(ctx, &[a, b], scale, offset, color, width);
}

/// Filled vertex dot.
pub fn draw_dot(
    ctx: &CanvasRenderingContext2d,
    p: Point,
    r: f64,
    scale: f64,
    offset: (f64, f64),
    color: &str,
) {
    let (x, y) = to_screen(p, scale, offset);
    ctx.begin_path();
    let _ = ctx.arc(x, y, r * scale, 0.0, 2.0 * std::f64::consts::PI);
    set_fill_style(ctx, color);
    ctx.fill();
}

/// Vertex label, offset in logical units from its anchor point.
pub fn draw_label(
    ctx: &CanvasRenderingContext2d,
    text: &str,
    p: Point,
    dx: f64,
    dy: f64,
    scale: f64,
    offset: (f64, f64),
    color: &str,
) {
    let (x, y) = to_screen(
        Point {
            x: p.x + dx,
            y: p.y + dy,
        },
        scale,
        offset,
    );
    let size = (16.0 * scale).clamp(10.0, 28.0);
    ctx.set_font(&format!("bold {size}px sans-serif"));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    set_fill_style(ctx, color);
    let _ = ctx.fill_text(text, x, y);
}
