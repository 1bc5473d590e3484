use leptos::ev::EventDescriptor;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, HtmlCanvasElement};

use crate::domain::logging::LogComponent;
use crate::log_trace;

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
    pub once: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false, once: false }
    }
}

/// A window listener that is removed when the handle drops.
pub struct WindowEventListenerHandle {
    event_name: String,
    callback: Closure<dyn FnMut(Event)>,
    capture: bool,
}

impl Drop for WindowEventListenerHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback_and_bool(
                &self.event_name,
                self.callback.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }
}

pub fn window_event_listener_with_options<E>(
    event: E,
    options: &EventOptions,
    mut cb: impl FnMut(E::EventType) + 'static,
) -> WindowEventListenerHandle
where
    E: EventDescriptor + 'static,
    E::EventType: JsCast,
{
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);
    opts.set_once(options.once);

    let event_name = event.name().into_owned();
    let callback = Closure::wrap(Box::new(move |ev: Event| {
        cb(ev.unchecked_into::<E::EventType>());
    }) as Box<dyn FnMut(Event)>);

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            &event_name,
            callback.as_ref().unchecked_ref(),
            &opts,
        );
    }

    WindowEventListenerHandle { event_name, callback, capture: options.capture }
}

/// Device-pixel size of a canvas shown at `client_width × client_height` CSS
/// pixels. A non-positive or non-finite ratio counts as 1.
pub fn backing_size(client_width: i32, client_height: i32, device_pixel_ratio: f64) -> (u32, u32) {
    let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let scale = |css: i32| (f64::from(css.max(0)) * ratio).round() as u32;
    (scale(client_width), scale(client_height))
}

/// Sets the canvas' backing store to its displayed size in device pixels.
///
/// A canvas that is not laid out (zero client size) keeps its current size.
pub fn fit_canvas_to_display(canvas: &HtmlCanvasElement) -> (u32, u32) {
    let ratio = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let (width, height) = backing_size(canvas.client_width(), canvas.client_height(), ratio);
    if width == 0 || height == 0 {
        return (canvas.width(), canvas.height());
    }
    if (width, height) != (canvas.width(), canvas.height()) {
        canvas.set_width(width);
        canvas.set_height(height);
        log_trace!(LogComponent::Presentation("Resize"), "📐 Canvas backing store {width}x{height}");
    }
    (width, height)
}

/// Keeps `canvas` matched to its displayed size while the handle lives. The
/// render loop picks the new size up on its next frame.
pub fn watch_canvas_size(canvas: HtmlCanvasElement) -> WindowEventListenerHandle {
    window_event_listener_with_options(leptos::ev::resize, &EventOptions::default(), move |_| {
        fit_canvas_to_display(&canvas);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_pixel_ratio() {
        assert_eq!(backing_size(400, 300, 2.0), (800, 600));
        assert_eq!(backing_size(333, 100, 1.5), (500, 150));
    }

    #[test]
    fn bad_ratio_falls_back_to_one() {
        assert_eq!(backing_size(400, 300, 0.0), (400, 300));
        assert_eq!(backing_size(400, 300, f64::NAN), (400, 300));
    }

    #[test]
    fn negative_client_size_is_empty() {
        assert_eq!(backing_size(-5, 10, 1.0), (0, 10));
    }
}
