//! One running viewer: GPU session, render loop, refresh loop and resize
//! listener, torn down together.

use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlCanvasElement;

use super::data_source::{DataSourceAdapter, Magnitudes, RefreshLoop};
use super::frame_scheduler::{FrameScheduler, RenderLoopHandle, start_render_loop};
use crate::domain::{
    camera::CameraRig,
    errors::RenderResult,
    geometry::{CUBE_INDICES, ColorVertex, Vertex, bar_cube, color_cube},
    instances::{InstanceDataBinder, InstanceRecord, InstanceStaging},
    logging::{LogComponent, get_logger},
    scene::{DataOrigin, DeviceStatus, SceneConfig, SceneKind},
};
use crate::event_utils::{WindowEventListenerHandle, fit_canvas_to_display, watch_canvas_size};
use crate::global_state::{average_fps, data_origin, device_status};
use crate::infrastructure::{
    http::QuoteHttpClient,
    rendering::{BARS_SHADER, CUBE_SHADER, DEPTH_FORMAT, RenderSession, mesh_layouts},
    ui::UiNotificationService,
};

pub struct SceneSession {
    kind: SceneKind,
    canvas_id: String,
    session: Rc<RefCell<RenderSession>>,
    render_loop: Option<RenderLoopHandle>,
    refresh: Option<RefreshLoop>,
    resize: Option<WindowEventListenerHandle>,
}

impl SceneSession {
    /// Brings a scene up on `canvas`: validates `config`, acquires the GPU,
    /// provisions buffers and pipeline, then starts the loops.
    ///
    /// Without WebGPU the canvas is replaced by the fallback message and
    /// `UnsupportedDevice` is returned; nothing keeps running.
    pub async fn start(
        canvas: HtmlCanvasElement,
        kind: SceneKind,
        config: SceneConfig,
    ) -> RenderResult<Self> {
        config.validate()?;
        device_status().set(DeviceStatus::Probing);
        data_origin().set(DataOrigin::Pending);
        fit_canvas_to_display(&canvas);

        let mut session = match RenderSession::new(canvas.clone()).await {
            Ok(session) => session,
            Err(e) => {
                device_status().set(DeviceStatus::Unsupported);
                let ui = UiNotificationService::new();
                ui.update_status(&canvas.id(), "WebGPU unavailable");
                if let Err(ui_err) = ui.show_fallback(&canvas) {
                    get_logger().error(
                        LogComponent::Application("SceneSession"),
                        &format!("❌ Could not show fallback: {ui_err}"),
                    );
                }
                return Err(e);
            }
        };

        provision(&mut session, kind, &config)?;
        session.set_clear_color(config.clear_color);
        device_status().set(DeviceStatus::Ready);

        let canvas_id = canvas.id();
        UiNotificationService::new().update_status(&canvas_id, &format!("Rendering {kind}"));
        let session = Rc::new(RefCell::new(session));

        let instance_count = config.instance_count(kind) as u32;
        let scheduler = FrameScheduler::new(CameraRig::for_scene(kind, &config), instance_count);
        let render_loop = start_render_loop(scheduler, Rc::clone(&session), |stats| {
            average_fps().set(stats.average_fps());
        });

        let refresh = match kind {
            SceneKind::Bars => Some(start_refresh(&session, &config)),
            SceneKind::Cube => None,
        };

        let resize = watch_canvas_size(canvas);

        get_logger().info(
            LogComponent::Application("SceneSession"),
            &format!("🚀 Scene '{kind}' running on #{canvas_id} with {instance_count} instances"),
        );

        Ok(Self {
            kind,
            canvas_id,
            session,
            render_loop: Some(render_loop),
            refresh,
            resize: Some(resize),
        })
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.as_ref().is_some_and(RenderLoopHandle::is_running)
    }

    pub fn performance_info(&self) -> String {
        self.session.borrow().performance_info()
    }

    /// Stops every loop and listener. GPU objects go with the last reference
    /// to the session. Calling it again does nothing.
    pub fn stop(&mut self) {
        let was_running = self.render_loop.is_some();
        self.render_loop.take();
        self.refresh.take();
        self.resize.take();
        if was_running {
            get_logger().info(
                LogComponent::Application("SceneSession"),
                &format!("🧹 Scene on #{} stopped", self.canvas_id),
            );
        }
    }
}

impl Drop for SceneSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn provision(session: &mut RenderSession, kind: SceneKind, config: &SceneConfig) -> RenderResult<()> {
    let color_format = session.surface_format();
    match kind {
        SceneKind::Bars => {
            let instances =
                InstanceStaging::bar_row(config.bar_count, config.bar_spacing, config.bar_footprint);
            session.provision_buffers(&bar_cube(), &CUBE_INDICES, instances);
            session.provision_pipeline(
                BARS_SHADER,
                &mesh_layouts::<Vertex>(),
                color_format,
                DEPTH_FORMAT,
            )
        }
        SceneKind::Cube => {
            let instances = InstanceStaging::new(vec![InstanceRecord::IDENTITY]);
            session.provision_buffers(&color_cube(), &CUBE_INDICES, instances);
            session.provision_pipeline(
                CUBE_SHADER,
                &mesh_layouts::<ColorVertex>(),
                color_format,
                DEPTH_FORMAT,
            )
        }
    }
}

fn start_refresh(session: &Rc<RefCell<RenderSession>>, config: &SceneConfig) -> RefreshLoop {
    let quotes = QuoteHttpClient::new(
        config.quote_url.clone(),
        config.rate_pointer.clone(),
        config.fetch_timeout_ms,
    );
    let adapter = Rc::new(DataSourceAdapter::new(quotes, config.bar_count));
    let binder = InstanceDataBinder::new(config.bar_count);
    let session = Rc::clone(session);

    RefreshLoop::start(adapter, config.refresh_interval_ms, move |magnitudes: Magnitudes| {
        bind_magnitudes(&session, &binder, &magnitudes)
    })
}

/// Writes `magnitudes` into the instance staging area and publishes their
/// origin. A session held elsewhere drops this refresh; the next one retries.
fn bind_magnitudes(
    session: &RefCell<RenderSession>,
    binder: &InstanceDataBinder,
    magnitudes: &Magnitudes,
) -> RenderResult<()> {
    let Ok(mut session) = session.try_borrow_mut() else {
        get_logger().debug(
            LogComponent::Application("SceneSession"),
            "⏭️ Render session busy, dropping refresh",
        );
        return Ok(());
    };
    binder.bind(session.instances_mut(), &magnitudes.values)?;
    data_origin().set(magnitudes.origin);
    if magnitudes.origin == DataOrigin::Synthetic {
        get_logger().debug(
            LogComponent::Application("SceneSession"),
            "🎲 Bound synthetic magnitudes",
        );
    }
    Ok(())
}
