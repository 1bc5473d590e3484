//! Per-frame camera update and draw submission.

use crate::domain::{camera::CameraRig, math::Mat4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerState {
    Idle,
    Running { frames: u64, last_timestamp_ms: f64 },
}

/// Everything one frame needs from the CPU side.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub transform: Mat4,
    pub surface_size: (u32, u32),
    pub instance_count: u32,
}

/// Drives the camera from frame timestamps and turns each tick into a
/// [`FramePlan`].
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: SchedulerState,
    camera: CameraRig,
    instance_count: u32,
}

impl FrameScheduler {
    pub fn new(camera: CameraRig, instance_count: u32) -> Self {
        Self { state: SchedulerState::Idle, camera, instance_count }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn frames(&self) -> u64 {
        match self.state {
            SchedulerState::Idle => 0,
            SchedulerState::Running { frames, .. } => frames,
        }
    }

    /// Advances the camera for a frame at `timestamp_ms` rendered into a
    /// `surface_size` target.
    ///
    /// The first frame has zero elapsed time. Timestamps that go backwards
    /// count as zero elapsed.
    pub fn plan_frame(&mut self, timestamp_ms: f64, surface_size: (u32, u32)) -> FramePlan {
        let (elapsed_secs, frames) = match self.state {
            SchedulerState::Idle => (0.0, 0),
            SchedulerState::Running { frames, last_timestamp_ms } => {
                (((timestamp_ms - last_timestamp_ms) / 1000.0).max(0.0), frames)
            }
        };

        self.camera.advance(elapsed_secs as f32);
        self.state = SchedulerState::Running { frames: frames + 1, last_timestamp_ms: timestamp_ms };

        let (width, height) = (surface_size.0.max(1), surface_size.1.max(1));
        FramePlan {
            transform: self.camera.transform(width as f32 / height as f32),
            surface_size: (width, height),
            instance_count: self.instance_count,
        }
    }

    /// Returns to `Idle`; the next frame starts with zero elapsed time.
    pub fn pause(&mut self) {
        self.state = SchedulerState::Idle;
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{RenderLoopHandle, start_render_loop};

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::FrameScheduler;
    use crate::domain::{
        errors::RenderResult,
        logging::{LogComponent, LogLevel, get_logger},
    };
    use crate::infrastructure::rendering::{FrameOutcome, FrameStats, RenderSession};
    use gloo::render::{AnimationFrame, request_animation_frame};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Frames between two progress log lines.
    const LOG_EVERY_FRAMES: u64 = 600;

    impl FrameScheduler {
        /// Matches the surface to the canvas, uploads the transform and any
        /// pending instance writes, then submits one draw.
        pub fn tick(
            &mut self,
            timestamp_ms: f64,
            session: &mut RenderSession,
        ) -> RenderResult<FrameOutcome> {
            let (width, height) = (session.canvas().width(), session.canvas().height());
            session.resize(width, height);

            let target = session.render_target();
            let plan = self.plan_frame(timestamp_ms, (target.width(), target.height()));

            session.write_transform(&plan.transform)?;
            session.flush_instances()?;
            let outcome = session.draw(plan.instance_count, timestamp_ms)?;

            if self.should_log() {
                get_logger().log_with_metadata(
                    LogLevel::Debug,
                    LogComponent::Application("FrameScheduler"),
                    &format!("🎬 Frame {}, {:.1} fps", self.frames(), session.stats().average_fps()),
                    &format!("{}x{}", plan.surface_size.0, plan.surface_size.1),
                );
            }
            Ok(outcome)
        }

        fn should_log(&self) -> bool {
            self.frames() % LOG_EVERY_FRAMES == 1
        }
    }

    struct LoopState {
        scheduler: RefCell<FrameScheduler>,
        session: Rc<RefCell<RenderSession>>,
        on_frame: Box<dyn Fn(&FrameStats)>,
        running: Cell<bool>,
        pending: RefCell<Option<AnimationFrame>>,
    }

    /// Keeps the animation-frame loop alive; stopping or dropping it cancels
    /// the next frame.
    pub struct RenderLoopHandle {
        state: Rc<LoopState>,
    }

    impl RenderLoopHandle {
        pub fn is_running(&self) -> bool {
            self.state.running.get()
        }

        pub fn stop(&self) {
            if self.state.running.replace(false) {
                self.state.pending.borrow_mut().take();
                get_logger().info(LogComponent::Application("FrameScheduler"), "⏹️ Render loop stopped");
            }
        }
    }

    impl Drop for RenderLoopHandle {
        fn drop(&mut self) {
            self.stop();
        }
    }

    /// Schedules `scheduler` on every animation frame until the handle is
    /// stopped. `on_frame` sees the stats after each submitted frame.
    pub fn start_render_loop(
        scheduler: FrameScheduler,
        session: Rc<RefCell<RenderSession>>,
        on_frame: impl Fn(&FrameStats) + 'static,
    ) -> RenderLoopHandle {
        let state = Rc::new(LoopState {
            scheduler: RefCell::new(scheduler),
            session,
            on_frame: Box::new(on_frame),
            running: Cell::new(true),
            pending: RefCell::new(None),
        });

        schedule(Rc::clone(&state));
        get_logger().info(LogComponent::Application("FrameScheduler"), "▶️ Render loop started");

        RenderLoopHandle { state }
    }

    fn schedule(state: Rc<LoopState>) {
        let next = Rc::clone(&state);
        let frame = request_animation_frame(move |timestamp_ms| {
            if !next.running.get() {
                return;
            }
            run_frame(&next, timestamp_ms);
            schedule(next);
        });
        *state.pending.borrow_mut() = Some(frame);
    }

    fn run_frame(state: &LoopState, timestamp_ms: f64) {
        let mut session = state.session.borrow_mut();
        match state.scheduler.borrow_mut().tick(timestamp_ms, &mut session) {
            Ok(FrameOutcome::Submitted) => (state.on_frame)(session.stats()),
            Ok(FrameOutcome::Skipped) => {}
            Err(e) => get_logger().error(
                LogComponent::Application("FrameScheduler"),
                &format!("❌ Frame failed: {e}"),
            ),
        }
    }
}
