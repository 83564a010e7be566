//! Browser event wiring.
//!
//! Handlers only forward into the shared [`Viewer`](orbview_core::Viewer);
//! the next animation frame picks the changes up.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use orbview_core::{BuildTicket, LoopControl, Selection};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent, Window,
};

use crate::SharedViewer;

fn inner_size(window: &Window) -> (f64, f64) {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(1.0)
    };
    (
        dimension(window.inner_width()),
        dimension(window.inner_height()),
    )
}

/// Match the canvas drawing buffer to the window and recompute the layout
pub fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement, viewer: &SharedViewer) {
    let (width, height) = inner_size(window);
    let (width, height) = (width.max(1.0) as u32, height.max(1.0) as u32);
    canvas.set_width(width);
    canvas.set_height(height);
    viewer.borrow_mut().resize(width, height);
}

pub fn install_resize(
    window: &Window,
    canvas: HtmlCanvasElement,
    viewer: SharedViewer,
) -> Result<(), JsValue> {
    let target = window.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        fit_canvas(&target, &canvas, &viewer);
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

pub fn install_keyboard(window: &Window, viewer: SharedViewer) -> Result<(), JsValue> {
    let on_key = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        viewer.borrow_mut().key_pressed(&event.key());
    }) as Box<dyn FnMut(KeyboardEvent)>);
    window.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
    on_key.forget();
    Ok(())
}

pub fn install_pointer(
    window: &Window,
    canvas: &HtmlCanvasElement,
    viewer: SharedViewer,
) -> Result<(), JsValue> {
    let mouse_window = window.clone();
    let mouse_viewer = Rc::clone(&viewer);
    let on_mouse = Closure::wrap(Box::new(move |event: MouseEvent| {
        let (width, height) = inner_size(&mouse_window);
        mouse_viewer.borrow_mut().pointer_moved(
            event.client_x() as f32,
            event.client_y() as f32,
            width as f32,
            height as f32,
        );
    }) as Box<dyn FnMut(MouseEvent)>);
    window.add_event_listener_with_callback("mousemove", on_mouse.as_ref().unchecked_ref())?;
    on_mouse.forget();

    let touch_window = window.clone();
    let on_touch = Closure::wrap(Box::new(move |event: TouchEvent| {
        event.prevent_default();
        let Some(touch) = event.touches().get(0) else {
            return;
        };
        let (width, height) = inner_size(&touch_window);
        viewer.borrow_mut().pointer_moved(
            touch.client_x() as f32,
            touch.client_y() as f32,
            width as f32,
            height as f32,
        );
    }) as Box<dyn FnMut(TouchEvent)>);

    // Non-passive so prevent_default can stop scrolling and pinch zoom
    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    for kind in ["touchstart", "touchmove"] {
        canvas.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            on_touch.as_ref().unchecked_ref(),
            &options,
        )?;
    }
    on_touch.forget();
    Ok(())
}

/// Activate a menu entry; mesh entries complete after the configured delay
pub fn select(window: &Window, viewer: &SharedViewer, label: &str) {
    let selection = viewer.borrow_mut().select(label);
    match selection {
        Ok(Selection::Build(ticket)) => {
            if let Err(err) = schedule_build(window, viewer, ticket) {
                log::error!("could not schedule build of {label:?}: {err:?}");
                viewer.borrow_mut().cancel_build(ticket);
            }
        }
        Ok(Selection::ModeChanged(_)) => {}
        Err(err) => log::warn!("{err}"),
    }
}

fn schedule_build(
    window: &Window,
    viewer: &SharedViewer,
    ticket: BuildTicket,
) -> Result<(), JsValue> {
    let delay_ms = timeout_ms(viewer.borrow().config().build_delay);
    let viewer = Rc::clone(viewer);
    let complete = Closure::once_into_js(move || {
        // Failures are logged by the scheduler and leave the old model up
        let _ = viewer.borrow_mut().complete_build(ticket);
    });
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(complete.unchecked_ref(), delay_ms)?;
    Ok(())
}

/// `setTimeout` delay, saturating at the largest value it accepts
fn timeout_ms(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

/// Drive `Viewer::tick` from `requestAnimationFrame` for as long as it
/// returns [`LoopControl::Continue`]
pub fn start_animation(window: Window, viewer: SharedViewer) -> Result<(), JsValue> {
    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next_frame = Rc::clone(&frame);
    let target = window.clone();

    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        if viewer.borrow_mut().tick(timestamp) == LoopControl::Stop {
            return;
        }
        if let Some(callback) = next_frame.borrow().as_ref() {
            if let Err(err) = target.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = frame.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_ms_saturates() {
        assert_eq!(timeout_ms(Duration::from_millis(30)), 30);
        assert_eq!(timeout_ms(Duration::from_millis(u64::from(u32::MAX))), i32::MAX);
    }
}
