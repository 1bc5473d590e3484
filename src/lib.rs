//! Instanced WebGPU scenes in the browser: a spinning cube and a row of bars
//! whose heights follow a periodically refreshed price quote.

use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, get_logger};

pub mod application;
pub mod domain;
pub mod event_utils;
pub mod global_state;
pub mod infrastructure;
pub mod macros;

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod presentation;

/// Installs the panic hook and the browser logger and clock.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(infrastructure::services::BrowserTimeProvider::new()));

    get_logger().info(LogComponent::Presentation("Initialize"), "🚀 Scene viewer module loaded");
}

/// Mounts the standalone Leptos page running `kind` ("cube" or "bars").
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = mountApp)]
pub fn mount_app(kind: String) -> Result<(), JsValue> {
    use crate::app::App;
    use leptos::*;
    use std::str::FromStr;

    let kind = domain::scene::SceneKind::from_str(&kind).map_err(|_| {
        domain::errors::RenderError::InvalidConfig(format!("unknown scene kind '{kind}'"))
    })?;
    mount_to_body(move || view! { <App kind=kind/> });
    Ok(())
}
