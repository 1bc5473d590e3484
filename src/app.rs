use leptos::html::Canvas;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::application::SceneSession;
use crate::domain::{
    logging::{LogComponent, get_logger},
    scene::{DataOrigin, DeviceStatus, SceneConfig, SceneKind},
};
use crate::global_state::{average_fps, data_origin, device_status};

/// Id of the canvas the shell renders into.
pub const CANVAS_ID: &str = "scene-canvas";

/// Standalone page: a full-width canvas running `kind` and a status line.
#[component]
pub fn App(kind: SceneKind) -> impl IntoView {
    view! {
        <style>
            {r#"
            .scene-app {
                font-family: -apple-system, BlinkMacSystemFont, sans-serif;
                background: #14161e;
                min-height: 100vh;
                margin: 0;
                color: #e6e6e6;
            }

            .scene-app canvas {
                display: block;
                width: 100%;
                height: 80vh;
            }

            .scene-status {
                display: flex;
                gap: 24px;
                padding: 8px 16px;
                font-size: 13px;
                opacity: 0.8;
            }

            .scene-fallback {
                padding: 40px;
                text-align: center;
                font-size: 18px;
            }
            "#}
        </style>
        <div class="scene-app">
            <SceneCanvas kind=kind/>
            <StatusBar kind=kind/>
        </div>
    }
}

#[component]
fn SceneCanvas(kind: SceneKind) -> impl IntoView {
    let canvas_ref = create_node_ref::<Canvas>();
    let slot: Rc<RefCell<Option<SceneSession>>> = Rc::new(RefCell::new(None));

    {
        let slot = Rc::clone(&slot);
        create_effect(move |started: Option<bool>| {
            if started == Some(true) {
                return true;
            }
            let Some(canvas) = canvas_ref.get() else {
                return false;
            };
            let canvas: web_sys::HtmlCanvasElement = (*canvas).clone();
            let slot = Rc::clone(&slot);
            spawn_local(async move {
                match SceneSession::start(canvas, kind, SceneConfig::default()).await {
                    Ok(session) => *slot.borrow_mut() = Some(session),
                    Err(e) => get_logger().error(
                        LogComponent::Presentation("App"),
                        &format!("❌ Scene failed to start: {e}"),
                    ),
                }
            });
            true
        });
    }

    on_cleanup(move || {
        slot.borrow_mut().take();
    });

    view! { <canvas id=CANVAS_ID node_ref=canvas_ref></canvas> }
}

#[component]
fn StatusBar(kind: SceneKind) -> impl IntoView {
    let status = device_status();
    let origin = data_origin();
    let fps = average_fps();

    view! {
        <div class="scene-status">
            <span>{format!("Scene: {kind}")}</span>
            <span>
                {move || match status.get() {
                    DeviceStatus::Probing => "⏳ Probing GPU",
                    DeviceStatus::Ready => "🟢 WebGPU",
                    DeviceStatus::Unsupported => "🔴 No WebGPU",
                }}
            </span>
            <Show when=move || kind == SceneKind::Bars>
                <span>
                    {move || match origin.get() {
                        DataOrigin::Pending => "Data: pending",
                        DataOrigin::Live => "Data: live quote",
                        DataOrigin::Synthetic => "Data: synthetic",
                    }}
                </span>
            </Show>
            <span>{move || format!("{:.1} fps", fps.get())}</span>
        </div>
    }
}
