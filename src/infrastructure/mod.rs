pub mod http;
pub mod rendering;
pub mod services;

/// DOM updates that sit outside the render path.
pub mod ui {
    use crate::domain::{
        errors::{RenderError, RenderResult},
        logging::{LogComponent, get_logger},
    };
    use web_sys::HtmlCanvasElement;

    /// Text shown in place of the scene when WebGPU is missing.
    pub const FALLBACK_MESSAGE: &str =
        "Your browser does not support WebGPU, so this 3D view cannot be displayed.";

    /// Element id of the fallback message inserted next to a canvas.
    pub fn fallback_element_id(canvas_id: &str) -> String {
        format!("{canvas_id}-fallback")
    }

    #[derive(Clone, Default)]
    pub struct UiNotificationService;

    impl UiNotificationService {
        pub fn new() -> Self {
            Self
        }

        /// Hides `canvas` and puts a static message in its place.
        ///
        /// Calling it twice for the same canvas leaves a single message.
        pub fn show_fallback(&self, canvas: &HtmlCanvasElement) -> RenderResult<()> {
            get_logger().warn(
                LogComponent::Infrastructure("UI"),
                "⚠️ WebGPU unavailable, showing static fallback message",
            );

            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| RenderError::Surface("document not available".to_string()))?;

            let id = fallback_element_id(&canvas.id());
            if document.get_element_by_id(&id).is_none() {
                let message = document
                    .create_element("p")
                    .map_err(|e| RenderError::Surface(format!("create_element failed: {e:?}")))?;
                message.set_id(&id);
                message.set_class_name("scene-fallback");
                message.set_text_content(Some(FALLBACK_MESSAGE));
                if let Some(parent) = canvas.parent_node() {
                    let anchor: &web_sys::Node = canvas.as_ref();
                    parent
                        .insert_before(&message, Some(anchor))
                        .map_err(|e| RenderError::Surface(format!("insert failed: {e:?}")))?;
                }
            }

            canvas
                .set_attribute("style", "display: none;")
                .map_err(|e| RenderError::Surface(format!("hide canvas failed: {e:?}")))?;
            Ok(())
        }

        /// Writes `status` into the optional `#<canvas_id>-status` element.
        pub fn update_status(&self, canvas_id: &str, status: &str) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            match document.get_element_by_id(&format!("{canvas_id}-status")) {
                Some(element) => element.set_text_content(Some(status)),
                None => get_logger().trace(
                    LogComponent::Infrastructure("UI"),
                    "status element not found (optional)",
                ),
            }
        }
    }
}
