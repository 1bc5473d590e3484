//! Orchestration: data refresh, frame scheduling and the session that owns
//! them both.

pub mod data_source;
pub mod frame_scheduler;
#[cfg(target_arch = "wasm32")]
pub mod scene_session;

pub use data_source::{DataSourceAdapter, InFlightGuard, Magnitudes, halts_refresh};
#[cfg(target_arch = "wasm32")]
pub use data_source::RefreshLoop;
pub use frame_scheduler::{FramePlan, FrameScheduler, SchedulerState};
#[cfg(target_arch = "wasm32")]
pub use scene_session::SceneSession;
