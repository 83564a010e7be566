/// orbview Web - WASM viewer rendering through WebGL2
///
/// Expects a page with a canvas plus busy, HUD and menu elements (ids are
/// configurable). JavaScript only constructs a [`WebViewer`] and calls
/// `init`; everything else is wired from Rust.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use orbview_core::{Menu, RenderMode, Viewer, ViewerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod dom;
pub mod events;
pub mod gl;

pub use dom::{DomIds, DomStatus};
pub use gl::WebGlBackend;

pub type SharedViewer = Rc<RefCell<Viewer<WebGlBackend, DomStatus>>>;

#[wasm_bindgen]
pub struct WebViewer {
    config: ViewerConfig,
    ids: DomIds,
    viewer: Option<SharedViewer>,
}

#[wasm_bindgen]
impl WebViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebViewer {
        WebViewer {
            config: ViewerConfig::default(),
            ids: DomIds::default(),
            viewer: None,
        }
    }

    /// Override the busy indicator, HUD and menu container ids
    pub fn set_element_ids(&mut self, busy: &str, hud: &str, menu: &str) {
        self.ids = DomIds {
            busy: busy.to_string(),
            hud: hud.to_string(),
            menu: menu.to_string(),
        };
    }

    /// Delay between showing the busy indicator and building a mesh
    pub fn set_build_delay_ms(&mut self, delay_ms: u32) {
        self.config.build_delay = Duration::from_millis(u64::from(delay_ms));
    }

    /// Attach to the canvas, render the menu, hook up input and start the frame loop
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        if self.viewer.is_some() {
            return Err(JsValue::from_str("viewer already initialized"));
        }

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("missing canvas #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("webgl2")?
            .ok_or_else(|| JsValue::from_str("WebGL2 unavailable"))?
            .dyn_into::<WebGl2RenderingContext>()?;

        let backend = WebGlBackend::new(context).map_err(to_js)?;
        let status = DomStatus::new(&document, &self.ids)?;
        let viewer = Viewer::new(
            backend,
            status,
            self.config.clone(),
            Menu::builtin(),
            canvas.width(),
            canvas.height(),
        )
        .map_err(to_js)?;
        let viewer: SharedViewer = Rc::new(RefCell::new(viewer));

        // Layout must match the window before the first frame is drawn
        events::fit_canvas(&window, &canvas, &viewer);

        let menu_container = dom::element_by_id(&document, &self.ids.menu)?;
        let menu = viewer.borrow().menu().clone();
        let select_window = window.clone();
        let select_viewer = Rc::clone(&viewer);
        dom::render_menu(
            &document,
            &menu_container,
            &menu,
            Rc::new(move |label: &str| events::select(&select_window, &select_viewer, label)),
        )?;

        events::install_resize(&window, canvas.clone(), Rc::clone(&viewer))?;
        events::install_keyboard(&window, Rc::clone(&viewer))?;
        events::install_pointer(&window, &canvas, Rc::clone(&viewer))?;
        events::start_animation(window, Rc::clone(&viewer))?;

        log::info!("viewer attached to #{canvas_id}");
        self.viewer = Some(viewer);
        Ok(())
    }

    /// Activate a menu entry by label, as if its button was clicked
    pub fn select(&self, label: &str) -> Result<(), JsValue> {
        let viewer = self.shared()?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        events::select(&window, viewer, label);
        Ok(())
    }

    /// Switch between mono and stereo rendering
    pub fn set_stereo(&self, stereo: bool) -> Result<(), JsValue> {
        let mode = if stereo {
            RenderMode::Stereo
        } else {
            RenderMode::Normal
        };
        self.shared()?.borrow_mut().set_mode(mode);
        Ok(())
    }

    pub fn eye_separation(&self) -> Result<f32, JsValue> {
        Ok(self.shared()?.borrow().input().eye_separation)
    }
}

impl WebViewer {
    fn shared(&self) -> Result<&SharedViewer, JsValue> {
        self.viewer
            .as_ref()
            .ok_or_else(|| JsValue::from_str("viewer not initialized; call init first"))
    }
}

impl Default for WebViewer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).map_err(to_js)?;
    Ok(())
}
