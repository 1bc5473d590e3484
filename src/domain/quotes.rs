//! The external quote contract: an untyped JSON body carrying one textual,
//! comma-grouped decimal rate.

use futures::future::LocalBoxFuture;
use serde_json::Value;

use super::errors::{RenderError, RenderResult};

/// Source of a single reference rate.
pub trait QuoteSource {
    fn fetch_rate(&self) -> LocalBoxFuture<'_, RenderResult<f64>>;
}

/// Extracts the rate found at `pointer` in `body`.
///
/// The field must be a string such as `"43,281.5123"`; group separators are
/// removed before parsing. Missing fields, other JSON types, unparseable text
/// and non-positive or non-finite values are all `DataFetchFailure`.
pub fn parse_quote_rate(body: &Value, pointer: &str) -> RenderResult<f64> {
    let field = body
        .pointer(pointer)
        .ok_or_else(|| RenderError::DataFetchFailure(format!("missing field {pointer}")))?;
    let text = field
        .as_str()
        .ok_or_else(|| RenderError::DataFetchFailure(format!("field {pointer} is not a string")))?;

    let degrouped: String = text.chars().filter(|c| *c != ',').collect();
    let rate = degrouped
        .trim()
        .parse::<f64>()
        .map_err(|e| RenderError::DataFetchFailure(format!("unparseable rate {text:?}: {e}")))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(RenderError::DataFetchFailure(format!("rate out of range: {rate}")));
    }
    Ok(rate)
}
