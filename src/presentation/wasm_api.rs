use gloo::utils::format::JsValueSerdeExt;
use js_sys::Promise;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlCanvasElement;

use crate::application::SceneSession;
use crate::domain::{
    errors::{RenderError, RenderResult},
    logging::{LogComponent, get_logger},
    scene::{SceneConfig, SceneKind},
};

/// JavaScript handle for one canvas.
///
/// ```js
/// const viewer = new SceneViewer("scene");
/// await viewer.start("bars", { barCount: 16 });
/// console.log(viewer.performanceInfo());
/// viewer.stop();
/// ```
#[wasm_bindgen]
pub struct SceneViewer {
    canvas_id: String,
    session: Rc<RefCell<Option<SceneSession>>>,
}

#[wasm_bindgen]
impl SceneViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: String) -> Self {
        Self { canvas_id, session: Rc::new(RefCell::new(None)) }
    }

    #[wasm_bindgen(getter, js_name = canvasId)]
    pub fn canvas_id(&self) -> String {
        self.canvas_id.clone()
    }

    /// Starts `kind` ("cube" or "bars") with optional config overrides,
    /// replacing any scene already running on this canvas.
    ///
    /// Rejects with the error message when the config is invalid or WebGPU is
    /// unavailable; in the latter case the fallback message is already shown.
    pub fn start(&self, kind: String, config: JsValue) -> Promise {
        let canvas_id = self.canvas_id.clone();
        let slot = Rc::clone(&self.session);

        future_to_promise(async move {
            let kind = SceneKind::from_str(&kind)
                .map_err(|_| RenderError::InvalidConfig(format!("unknown scene kind '{kind}'")))?;
            let config = parse_config(&config)?;
            get_logger().set_min_level(config.log_level()?);

            if let Some(mut previous) = slot.borrow_mut().take() {
                previous.stop();
            }

            let canvas = find_canvas(&canvas_id)?;
            let session = SceneSession::start(canvas, kind, config).await?;
            *slot.borrow_mut() = Some(session);

            Ok(JsValue::from_str(kind.as_ref()))
        })
    }

    #[wasm_bindgen(js_name = performanceInfo)]
    pub fn performance_info(&self) -> String {
        self.session
            .borrow()
            .as_ref()
            .map(SceneSession::performance_info)
            .unwrap_or_else(|| "{}".to_string())
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.borrow().as_ref().is_some_and(SceneSession::is_running)
    }

    /// Tears the scene down. Safe to call when nothing is running.
    pub fn stop(&self) {
        if let Some(mut session) = self.session.borrow_mut().take() {
            session.stop();
        }
    }
}

/// `undefined` and `null` mean "all defaults".
fn parse_config(value: &JsValue) -> RenderResult<SceneConfig> {
    if value.is_undefined() || value.is_null() {
        return Ok(SceneConfig::default());
    }
    let config: SceneConfig = value
        .into_serde()
        .map_err(|e| RenderError::InvalidConfig(format!("malformed config: {e}")))?;
    config.validate()?;
    Ok(config)
}

pub(crate) fn find_canvas(canvas_id: &str) -> RenderResult<HtmlCanvasElement> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| RenderError::Surface("document not available".to_string()))?;
    let element = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| RenderError::InvalidConfig(format!("no element with id '{canvas_id}'")))?;
    element.dyn_into::<HtmlCanvasElement>().map_err(|_| {
        get_logger().warn(
            LogComponent::Presentation("SceneViewer"),
            &format!("⚠️ #{canvas_id} is not a canvas"),
        );
        RenderError::InvalidConfig(format!("element '{canvas_id}' is not a canvas"))
    })
}
