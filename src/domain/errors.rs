use derive_more::Display;

/// Errors produced by the rendering engine.
///
/// `DataFetchFailure` is absorbed inside the data source adapter and never
/// reaches the render loop.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum RenderError {
    #[display(fmt = "WebGPU unavailable: {}", _0)]
    UnsupportedDevice(String),
    #[display(fmt = "expected {} magnitudes, got {}", expected, actual)]
    ShapeMismatch { expected: usize, actual: usize },
    #[display(fmt = "data fetch failed: {}", _0)]
    DataFetchFailure(String),
    #[display(fmt = "surface error: {}", _0)]
    Surface(String),
    #[display(fmt = "invalid configuration: {}", _0)]
    InvalidConfig(String),
    #[display(fmt = "{} not provisioned", _0)]
    NotProvisioned(&'static str),
}

impl std::error::Error for RenderError {}

impl From<RenderError> for wasm_bindgen::JsValue {
    fn from(err: RenderError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message() {
        let err = RenderError::ShapeMismatch { expected: 12, actual: 3 };
        assert_eq!(err.to_string(), "expected 12 magnitudes, got 3");
    }
}
