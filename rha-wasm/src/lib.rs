use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rha_core::{Phase, Point, Session, arc_path, corner_path};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    MouseEvent, Window,
};

mod canvas;
mod constants;
mod state;
mod utils;

use canvas::{draw_dot, draw_label, draw_polygon, draw_polyline, draw_segment, set_fill_style};
use constants::*;
use state::{STATE, State};
use utils::{dist_to_segment, event_canvas_coords, from_screen, get_query_param, log,
    sync_canvas_size, to_screen};

// Palette lifted from the host page theme.
const COLOR_TRIANGLE_FILL: &str = "rgba(6, 182, 212, 0.2)";
const COLOR_TRIANGLE: &str = "#22d3ee";
const COLOR_ACTIVE: &str = "#facc15";
const COLOR_SUCCESS: &str = "#4ade80";
const COLOR_SUCCESS_FILL: &str = "rgba(34, 197, 94, 0.3)";
const COLOR_RIGHT_ANGLE: &str = "#ef4444";
const COLOR_AXIS: &str = "#6b7280";
const COLOR_TEXT: &str = "#ffffff";
const COLOR_MUTED: &str = "#9ca3af";

fn init_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id("cv")
        .ok_or_else(|| JsValue::from_str("canvas #cv not found"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

/// Build the round RNG. A `?seed=<u64>` query parameter makes a round
/// reproducible; otherwise the clock seeds it.
fn make_rng(window: &Window) -> SmallRng {
    if let Ok(search) = window.location().search()
        && let Some(s) = get_query_param(&search, "seed")
        && let Ok(seed) = s.parse::<u64>()
    {
        log(&format!("seeded round: {seed}"));
        return SmallRng::seed_from_u64(seed);
    }
    SmallRng::seed_from_u64(js_sys::Date::now() as u64)
}

/// Fit the fixed logical drawing area into the current canvas size,
/// centered, preserving aspect ratio.
fn update_viewport(state: &mut State) {
    let canvas_w = state.canvas.width() as f64;
    let canvas_h = state.canvas.height() as f64;
    let scale_x = (canvas_w - 2.0 * VIEW_MARGIN) / LOGICAL_W;
    let scale_y = (canvas_h - 2.0 * VIEW_MARGIN) / LOGICAL_H;
    let scale = scale_x.min(scale_y).max(0.1);
    let ox = (canvas_w - LOGICAL_W * scale) / 2.0;
    let oy = (canvas_h - LOGICAL_H * scale) / 2.0;
    state.scale = scale;
    state.offset = (ox, oy);
}

/// Construction origin `D` in logical coordinates.
fn construction_origin() -> Point {
    Point {
        x: REF_W + PANEL_GAP + ORIGIN_X,
        y: ORIGIN_Y,
    }
}

fn draw(state: &mut State) {
    sync_canvas_size(state);
    update_viewport(state);
    let width = state.canvas.width() as f64;
    let height = state.canvas.height() as f64;
    state.ctx.clear_rect(0.0, 0.0, width, height);
    draw_reference_panel(state);
    draw_construction_panel(state);
    update_controls(state);
}

fn draw_reference_panel(state: &State) {
    let ctx = &state.ctx;
    let (scale, offset) = (state.scale, state.offset);
    let t = state.session.triangle();
    let idle = state.session.phase() == Phase::Idle;

    draw_polygon(
        ctx,
        &[t.a, t.b, t.c],
        scale,
        offset,
        COLOR_TRIANGLE_FILL,
        COLOR_TRIANGLE,
    );
    // Hypotenuse is the clickable handle while idle.
    let hyp_color = if idle { COLOR_ACTIVE } else { COLOR_TRIANGLE };
    draw_segment(ctx, t.a, t.c, scale, offset, hyp_color, 3.0);

    draw_polyline(
        ctx,
        &corner_path(t.b, t.a, t.c, RIGHT_ANGLE_RADIUS),
        scale,
        offset,
        COLOR_RIGHT_ANGLE,
        2.0,
    );
    draw_polyline(
        ctx,
        &arc_path(t.a, t.b, t.c, ACUTE_ARC_RADIUS),
        scale,
        offset,
        "#38bdf8",
        2.0,
    );

    let vert_color = if idle { COLOR_ACTIVE } else { COLOR_TRIANGLE };
    draw_dot(ctx, t.a, VERTEX_RADIUS, scale, offset, vert_color);
    draw_dot(ctx, t.b, VERTEX_RADIUS, scale, offset, COLOR_RIGHT_ANGLE);
    draw_dot(ctx, t.c, VERTEX_RADIUS, scale, offset, vert_color);
    draw_label(ctx, "A", t.a, -20.0, 0.0, scale, offset, COLOR_TEXT);
    draw_label(ctx, "B", t.b, 14.0, 16.0, scale, offset, COLOR_TEXT);
    draw_label(ctx, "C", t.c, -20.0, 15.0, scale, offset, COLOR_TEXT);
}

fn draw_construction_panel(state: &State) {
    let ctx = &state.ctx;
    let (scale, offset) = (state.scale, state.offset);
    let snap = state.session.snapshot();
    let d = construction_origin();
    let axis_end_x = Point {
        x: REF_W + PANEL_GAP + 20.0,
        y: d.y,
    };
    let axis_end_y = Point { x: d.x, y: 20.0 };

    draw_arrow(ctx, d, axis_end_x, scale, offset);
    draw_arrow(ctx, d, axis_end_y, scale, offset);
    // Right angle between the two axes.
    draw_polyline(
        ctx,
        &corner_path(d, axis_end_y, axis_end_x, 15.0),
        scale,
        offset,
        COLOR_RIGHT_ANGLE,
        2.0,
    );
    draw_label(ctx, "DH", axis_end_x, 14.0, -12.0, scale, offset, COLOR_MUTED);
    draw_label(ctx, "DG", axis_end_y, 16.0, 8.0, scale, offset, COLOR_MUTED);

    let active = snap.phase != Phase::Idle && snap.length > 0.0;
    let success = snap.phase == Phase::Success;
    let e = Point {
        x: d.x,
        y: d.y - snap.offset,
    };
    // Session coordinates are y-up relative to D; the panel is y-down.
    let f = Point {
        x: d.x + snap.point.x,
        y: d.y - snap.point.y,
    };

    if success {
        draw_polygon(
            ctx,
            &[d, e, f],
            scale,
            offset,
            COLOR_SUCCESS_FILL,
            COLOR_SUCCESS,
        );
    }
    if active {
        let seg_color = if success { COLOR_SUCCESS } else { COLOR_ACTIVE };
        draw_segment(ctx, e, f, scale, offset, seg_color, 2.0);
    }

    draw_dot(ctx, d, VERTEX_RADIUS, scale, offset, COLOR_TEXT);
    draw_label(ctx, "D", d, 12.0, 14.0, scale, offset, COLOR_TEXT);
    if active {
        draw_dot(ctx, e, VERTEX_RADIUS, scale, offset, COLOR_ACTIVE);
        draw_label(ctx, "E", e, -16.0, 0.0, scale, offset, COLOR_TEXT);
        draw_dot(ctx, f, VERTEX_RADIUS, scale, offset, COLOR_ACTIVE);
        draw_label(ctx, "F", f, 0.0, 18.0, scale, offset, COLOR_TEXT);
    }
}

fn draw_arrow(
    ctx: &CanvasRenderingContext2d,
    from: Point,
    to: Point,
    scale: f64,
    offset: (f64, f64),
) {
    draw_segment(ctx, from, to, scale, offset, COLOR_AXIS, 3.0);
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let mag = dx.hypot(dy);
    if mag == 0.0 {
        return;
    }
    let (ux, uy) = (dx / mag, dy / mag);
    let head = 9.0;
    let tip = to_screen(to, scale, offset);
    let left = to_screen(
        Point {
            x: to.x - head * ux + head * 0.5 * uy,
            y: to.y - head * uy - head * 0.5 * ux,
        },
        scale,
        offset,
    );
    let right = to_screen(
        Point {
            x: to.x - head * ux - head * 0.5 * uy,
            y: to.y - head * uy + head * 0.5 * ux,
        },
        scale,
        offset,
    );
    ctx.begin_path();
    ctx.move_to(tip.0, tip.1);
    ctx.line_to(left.0, left.1);
    ctx.line_to(right.0, right.1);
    ctx.close_path();
    set_fill_style(ctx, COLOR_AXIS);
    ctx.fill();
}

fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
}

fn set_text_by_id(document: &Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id)
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        el.set_inner_text(text);
    }
}

/// Push session values back into the DOM controls: slider positions and
/// bounds, disabled flags, readouts, and the instruction line.
fn update_controls(state: &State) {
    let doc = &state.document;
    let snap = state.session.snapshot();
    let idle = snap.phase == Phase::Idle;

    if let Some(sl) = input_by_id(doc, "offsetSlider") {
        sl.set_max(&format!("{:.1}", snap.offset_max));
        sl.set_value(&format!("{:.1}", snap.offset));
        sl.set_disabled(idle);
    }
    if let Some(sl) = input_by_id(doc, "angleSlider") {
        sl.set_value(&format!("{:.1}", snap.angle));
        sl.set_disabled(idle);
    }

    set_text_by_id(doc, "lengthVal", &format!("{:.0}", snap.length));
    set_text_by_id(
        doc,
        "angleVal",
        &format!("{:.1}\u{b0} / {:.0}\u{b0}", snap.angle, snap.true_angle),
    );
    let instruction = match snap.phase {
        Phase::Idle => "Click the yellow hypotenuse A\u{2013}C to pick it up.",
        Phase::Sliding => {
            "Slide E and the \u{2220}DEF angle until F touches the DH axis at the target angle."
        }
        Phase::Success => "Success! The RHA conditions determine exactly one right triangle.",
    };
    set_text_by_id(doc, "status", instruction);
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    // New-triangle button (full reset, valid in any phase)
    if let Some(btn) = doc.get_element_by_id("resetBtn") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            let s = &mut *s;
            s.session.generate_round(&mut s.rng);
            draw(s);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // E slider
    if let Some(sl) = input_by_id(&doc, "offsetSlider") {
        let st = state.clone();
        let sl_read = sl.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            if let Ok(v) = sl_read.value().parse::<f64>() {
                let v = v.clamp(0.0, s.session.offset_max());
                s.session.set_offset(v);
                draw(&mut s);
            }
        }));
        sl.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();
    }

    // Angle slider
    if let Some(sl) = input_by_id(&doc, "angleSlider") {
        let st = state.clone();
        let sl_read = sl.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            if let Ok(v) = sl_read.value().parse::<f64>() {
                let v = v.clamp(rha_core::ANGLE_SLIDER_MIN, rha_core::ANGLE_SLIDER_MAX);
                s.session.set_angle(v);
                draw(&mut s);
            }
        }));
        sl.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();
    }

    // Hypotenuse pick-up
    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            if s.session.phase() != Phase::Idle {
                return;
            }
            let (x, y) = event_canvas_coords(&e, &s.canvas);
            let p = from_screen(x, y, s.scale, s.offset);
            let t = s.session.triangle();
            if dist_to_segment(p, t.a, t.c) <= HYPOTENUSE_HIT_RADIUS {
                s.session.select_hypotenuse();
                draw(&mut s);
            }
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }

    // Redraw on resize so the logical area stays fitted
    {
        let st = state.clone();
        let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            draw(&mut st.borrow_mut());
        }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    Ok(())
}

/// Current session snapshot as JSON, for the host page.
#[wasm_bindgen]
pub fn snapshot_json() -> String {
    STATE.with(|st| {
        st.borrow()
            .as_ref()
            .map(|rc| {
                serde_json::to_string(&rc.borrow().session.snapshot())
                    .unwrap_or_else(|_| "{}".to_string())
            })
            .unwrap_or_else(|| "{}".to_string())
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;

    let mut rng = make_rng(&window);
    let mut session = Session::new();
    session.generate_round(&mut rng);

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        canvas,
        ctx,
        session,
        rng,
        scale: 1.0,
        offset: (0.0, 0.0),
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    attach_ui(state.clone())?;
    draw(&mut state.borrow_mut());
    Ok(())
}
