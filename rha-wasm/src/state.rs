use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rha_core::Session;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub session: Session,
    pub rng: SmallRng,
    // view transform: logical units -> px
    pub scale: f64,
    pub offset: (f64, f64),
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
