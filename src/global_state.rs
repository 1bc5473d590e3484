use crate::domain::scene::{DataOrigin, DeviceStatus};
use leptos::*;
use once_cell::sync::OnceCell;

/// Viewer status shared between the scene session and the Leptos shell.
pub struct Globals {
    pub device_status: RwSignal<DeviceStatus>,
    pub data_origin: RwSignal<DataOrigin>,
    pub average_fps: RwSignal<f64>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        device_status: create_rw_signal(DeviceStatus::Probing),
        data_origin: create_rw_signal(DataOrigin::Pending),
        average_fps: create_rw_signal(0.0),
    })
}

crate::global_signals! {
    pub device_status => device_status: DeviceStatus,
    pub data_origin => data_origin: DataOrigin,
    pub average_fps => average_fps: f64,
}
