//! JavaScript-facing surface.

pub mod wasm_api;

pub use wasm_api::SceneViewer;
