use rha_core::Point;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::MouseEvent;

use crate::state::State;

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

/// Ensure the canvas backing store matches the CSS size and device pixel
/// ratio to prevent non-uniform stretching.
pub fn sync_canvas_size(state: &mut State) {
    let dpr = state.window.device_pixel_ratio();
    let (css_w, css_h) = if let Some(el) = state.canvas.dyn_ref::<web_sys::Element>() {
        let rect = el.get_bounding_client_rect();
        (rect.width().max(1.0), rect.height().max(1.0))
    } else {
        (
            state.canvas.client_width() as f64,
            state.canvas.client_height() as f64,
        )
    };
    let target_w = (css_w * dpr).round().clamp(1.0, 10000.0) as u32;
    let target_h = (css_h * dpr).round().clamp(1.0, 10000.0) as u32;
    if state.canvas.width() != target_w {
        state.canvas.set_width(target_w);
    }
    if state.canvas.height() != target_h {
        state.canvas.set_height(target_h);
    }
}

/// Logical-space point to canvas pixels.
pub fn to_screen(p: Point, scale: f64, offset: (f64, f64)) -> (f64, f64) {
    let (ox, oy) = offset;
    (p.x * scale + ox, p.y * scale + oy)
}

/// Canvas pixels back into logical space.
pub fn from_screen(x: f64, y: f64, scale: f64, offset: (f64, f64)) -> Point {
    let (ox, oy) = offset;
    Point {
        x: (x - ox) / scale,
        y: (y - oy) / scale,
    }
}

/// Convert client coordinates into canvas internal pixel coordinates so hit
/// testing works even if CSS scales the canvas element.
pub fn event_canvas_coords(e: &MouseEvent, cv: &web_sys::HtmlCanvasElement) -> (f64, f64) {
    if let Some(el) = cv.dyn_ref::<web_sys::Element>() {
        let rect = el.get_bounding_client_rect();
        let x = (e.client_x() as f64 - rect.left()) * (cv.width() as f64) / rect.width().max(1.0);
        let y = (e.client_y() as f64 - rect.top()) * (cv.height() as f64) / rect.height().max(1.0);
        (x, y)
    } else {
        (e.offset_x() as f64, e.offset_y() as f64)
    }
}

/// Distance from `p` to the segment `a`-`b`, used for hypotenuse hit tests.
pub fn dist_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len2 = abx * abx + aby * aby;
    if len2 == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0);
    let qx = a.x + t * abx;
    let qy = a.y + t * aby;
    (p.x - qx).hypot(p.y - qy)
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s)
        .decode_utf8()
        .unwrap_or_else(|_| s.into())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance() {
        let a = Point { x: 0.0, y: 0.0 };
        let b = Point { x: 10.0, y: 0.0 };
        assert!((dist_to_segment(Point { x: 5.0, y: 3.0 }, a, b) - 3.0).abs() < 1e-12);
        // Beyond the endpoints the nearest point is the endpoint itself.
        assert!((dist_to_segment(Point { x: 14.0, y: 3.0 }, a, b) - 5.0).abs() < 1e-12);
        // Degenerate segment.
        assert!((dist_to_segment(Point { x: 3.0, y: 4.0 }, a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn query_param_parsing() {
        assert_eq!(
            get_query_param("?seed=42&x=1", "seed").as_deref(),
            Some("42")
        );
        assert_eq!(get_query_param("?x=1", "seed"), None);
        assert_eq!(
            get_query_param("?name=a%20b", "name").as_deref(),
            Some("a b")
        );
    }

    #[test]
    fn screen_round_trip() {
        let p = Point { x: 123.0, y: -4.5 };
        let (x, y) = to_screen(p, 2.0, (10.0, 20.0));
        let q = from_screen(x, y, 2.0, (10.0, 20.0));
        assert!((p.x - q.x).abs() < 1e-12);
        assert!((p.y - q.y).abs() < 1e-12);
    }
}
