use futures::future::{self, Either, FutureExt, LocalBoxFuture};
use gloo::net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;

use crate::domain::{
    errors::{RenderError, RenderResult},
    logging::{LogComponent, get_logger},
    quotes::{QuoteSource, parse_quote_rate},
};

/// HTTP quote client built on gloo.
///
/// One GET per call, raced against `timeout_ms`. No retries: the refresh
/// interval is the retry cadence.
#[derive(Clone)]
pub struct QuoteHttpClient {
    url: String,
    rate_pointer: String,
    timeout_ms: u32,
}

impl QuoteHttpClient {
    pub fn new(url: impl Into<String>, rate_pointer: impl Into<String>, timeout_ms: u32) -> Self {
        Self { url: url.into(), rate_pointer: rate_pointer.into(), timeout_ms }
    }

    async fn request_rate(&self) -> RenderResult<f64> {
        get_logger().debug(
            LogComponent::Infrastructure("QuoteHttpClient"),
            &format!("📡 Fetching quote from {}", self.url),
        );

        let response = Request::get(&self.url)
            .send()
            .await
            .map_err(|e| RenderError::DataFetchFailure(format!("request failed: {e:?}")))?;

        if !response.ok() {
            return Err(RenderError::DataFetchFailure(format!(
                "HTTP error: {} - {}",
                response.status(),
                response.status_text()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RenderError::DataFetchFailure(format!("invalid JSON: {e:?}")))?;

        parse_quote_rate(&body, &self.rate_pointer)
    }
}

impl QuoteSource for QuoteHttpClient {
    fn fetch_rate(&self) -> LocalBoxFuture<'_, RenderResult<f64>> {
        async move {
            let request = Box::pin(self.request_rate());
            let timeout = Box::pin(TimeoutFuture::new(self.timeout_ms));
            match future::select(request, timeout).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => Err(RenderError::DataFetchFailure(format!(
                    "no response within {} ms",
                    self.timeout_ms
                ))),
            }
        }
        .boxed_local()
    }
}
