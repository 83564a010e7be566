/// DOM side of the viewer: busy indicator, HUD text, and the shape menu
use std::rc::Rc;

use orbview_core::{Menu, StatusDisplay};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

/// Element ids the viewer looks up at init
#[derive(Debug, Clone)]
pub struct DomIds {
    pub busy: String,
    pub hud: String,
    pub menu: String,
}

impl Default for DomIds {
    fn default() -> Self {
        Self {
            busy: "busy".to_string(),
            hud: "hud".to_string(),
            menu: "menu".to_string(),
        }
    }
}

pub fn element_by_id(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
}

/// Busy indicator toggled through CSS visibility, HUD through text content
pub struct DomStatus {
    busy: HtmlElement,
    hud: HtmlElement,
}

impl DomStatus {
    pub fn new(document: &Document, ids: &DomIds) -> Result<Self, JsValue> {
        Ok(Self {
            busy: element_by_id(document, &ids.busy)?,
            hud: element_by_id(document, &ids.hud)?,
        })
    }
}

impl StatusDisplay for DomStatus {
    fn set_busy(&mut self, busy: bool) {
        let visibility = if busy { "visible" } else { "hidden" };
        if let Err(err) = self.busy.style().set_property("visibility", visibility) {
            log::warn!("could not toggle busy indicator: {err:?}");
        }
    }

    fn set_hud(&mut self, text: Option<&str>) {
        self.hud.set_text_content(text);
    }
}

/// Render one section per category with a button per entry.
/// Clicking a button calls `on_select` with the entry label.
pub fn render_menu(
    document: &Document,
    container: &Element,
    menu: &Menu,
    on_select: Rc<dyn Fn(&str)>,
) -> Result<(), JsValue> {
    for category in menu.categories() {
        let section = document.create_element("section")?;
        section.set_class_name("menu-category");

        let heading = document.create_element("h3")?;
        heading.set_text_content(Some(&category.label));
        section.append_child(&heading)?;

        for entry in &category.entries {
            let button = document.create_element("button")?;
            button.set_text_content(Some(&entry.label));

            let label = entry.label.clone();
            let on_select = Rc::clone(&on_select);
            let on_click = Closure::wrap(Box::new(move |_event: Event| {
                on_select(&label);
            }) as Box<dyn FnMut(Event)>);
            button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            on_click.forget();

            section.append_child(&button)?;
        }

        container.append_child(&section)?;
    }
    Ok(())
}
