//! Periodic magnitude refresh, decoupled from the render loop.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::domain::{
    errors::RenderError,
    logging::{LogComponent, get_logger},
    quotes::QuoteSource,
    scene::DataOrigin,
};
use crate::log_debug;

/// Upper bound (exclusive) of synthetic magnitudes.
pub const SYNTHETIC_MAX: f64 = 100.0;
/// Relative noise applied around a live rate: each bar is `rate × U[0.8, 1.2)`.
pub const LIVE_NOISE: std::ops::Range<f64> = 0.8..1.2;

/// One refresh worth of bar magnitudes and where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Magnitudes {
    pub values: Vec<f64>,
    pub origin: DataOrigin,
}

/// Produces `bar_count` magnitudes per call, from a live quote when one is
/// available and from local random data otherwise.
pub struct DataSourceAdapter<Q> {
    quotes: Q,
    bar_count: usize,
    rng: RefCell<StdRng>,
}

impl<Q: QuoteSource> DataSourceAdapter<Q> {
    pub fn new(quotes: Q, bar_count: usize) -> Self {
        Self::with_rng(quotes, bar_count, StdRng::from_entropy())
    }

    pub fn with_rng(quotes: Q, bar_count: usize, rng: StdRng) -> Self {
        Self { quotes, bar_count, rng: RefCell::new(rng) }
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    /// Never fails: any fetch or parse problem yields a synthetic sequence of
    /// the right length.
    pub async fn fetch_magnitudes(&self) -> Magnitudes {
        match self.quotes.fetch_rate().await {
            Ok(rate) => {
                log_debug!(LogComponent::Application("DataSource"), "📈 Live rate {rate:.4}");
                Magnitudes { values: self.perturbed(rate), origin: DataOrigin::Live }
            }
            Err(e) => {
                get_logger().warn(
                    LogComponent::Application("DataSource"),
                    &format!("⚠️ {e}; using synthetic magnitudes"),
                );
                Magnitudes { values: self.synthetic(), origin: DataOrigin::Synthetic }
            }
        }
    }

    fn perturbed(&self, rate: f64) -> Vec<f64> {
        let mut rng = self.rng.borrow_mut();
        (0..self.bar_count).map(|_| rate * rng.gen_range(LIVE_NOISE)).collect()
    }

    fn synthetic(&self) -> Vec<f64> {
        let mut rng = self.rng.borrow_mut();
        (0..self.bar_count).map(|_| rng.gen_range(0.0..SYNTHETIC_MAX)).collect()
    }
}

/// Single-slot in-flight flag so a slow refresh never overlaps the next one.
#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
    busy: Rc<Cell<bool>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot, or returns `None` when a refresh is still running.
    /// The slot is released when the returned token drops.
    pub fn try_acquire(&self) -> Option<InFlightToken> {
        if self.busy.replace(true) {
            return None;
        }
        Some(InFlightToken { busy: Rc::clone(&self.busy) })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

#[derive(Debug)]
pub struct InFlightToken {
    busy: Rc<Cell<bool>>,
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

/// Whether a sink error ends the refresh loop. A shape mismatch means the
/// adapter and the binder disagree on the bar count, which no later refresh
/// can fix.
pub fn halts_refresh(err: &RenderError) -> bool {
    matches!(err, RenderError::ShapeMismatch { .. })
}

/// Runs a refresh immediately and then every `interval_ms`, skipping ticks
/// that fire while the previous refresh is still pending.
///
/// Dropping the handle stops the interval. A refresh already in flight
/// completes but its result is still delivered to `sink`. A sink error for
/// which [`halts_refresh`] holds stops all further refreshes.
#[cfg(target_arch = "wasm32")]
pub struct RefreshLoop {
    halted: Rc<Cell<bool>>,
    _interval: gloo::timers::callback::Interval,
}

#[cfg(target_arch = "wasm32")]
impl RefreshLoop {
    pub fn start<Q, F>(adapter: Rc<DataSourceAdapter<Q>>, interval_ms: u32, sink: F) -> Self
    where
        Q: QuoteSource + 'static,
        F: Fn(Magnitudes) -> crate::domain::errors::RenderResult<()> + 'static,
    {
        let guard = InFlightGuard::new();
        let sink = Rc::new(sink);
        let halted = Rc::new(Cell::new(false));

        let stop_flag = Rc::clone(&halted);
        let trigger = move || {
            if stop_flag.get() {
                return;
            }
            let Some(token) = guard.try_acquire() else {
                get_logger().debug(
                    LogComponent::Application("RefreshLoop"),
                    "⏭️ Previous refresh still pending, skipping tick",
                );
                return;
            };
            let adapter = Rc::clone(&adapter);
            let sink = Rc::clone(&sink);
            let stop_flag = Rc::clone(&stop_flag);
            wasm_bindgen_futures::spawn_local(async move {
                let magnitudes = adapter.fetch_magnitudes().await;
                if stop_flag.get() {
                    return;
                }
                match sink(magnitudes) {
                    Ok(()) => {}
                    Err(e) if halts_refresh(&e) => {
                        stop_flag.set(true);
                        get_logger().error(
                            LogComponent::Application("RefreshLoop"),
                            &format!("❌ {e}; refresh stopped"),
                        );
                    }
                    Err(e) => get_logger().warn(
                        LogComponent::Application("RefreshLoop"),
                        &format!("⚠️ Refresh dropped: {e}"),
                    ),
                }
                drop(token);
            });
        };

        trigger();
        let interval = gloo::timers::callback::Interval::new(interval_ms, trigger);

        get_logger().info(
            LogComponent::Application("RefreshLoop"),
            &format!("🔄 Refreshing magnitudes every {interval_ms} ms"),
        );

        Self { halted, _interval: interval }
    }

    pub fn is_halted(&self) -> bool {
        self.halted.get()
    }
}
