use std::collections::VecDeque;

/// Number of frame intervals averaged for the FPS figure.
const FPS_WINDOW: usize = 60;

/// Rolling frame timing and submission counters.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    last_frame_ms: Option<f64>,
    fps_log: VecDeque<f64>,
    frames_submitted: u64,
    frames_skipped: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame presented at `now_ms` (a `performance.now()` timestamp).
    pub fn record_frame(&mut self, now_ms: f64) {
        self.frames_submitted += 1;
        if let Some(last) = self.last_frame_ms {
            let delta = now_ms - last;
            if delta > 0.0 {
                self.fps_log.push_back(1000.0 / delta);
                if self.fps_log.len() > FPS_WINDOW {
                    self.fps_log.pop_front();
                }
            }
        }
        self.last_frame_ms = Some(now_ms);
    }

    pub fn record_skip(&mut self) {
        self.frames_skipped += 1;
    }

    pub fn average_fps(&self) -> f64 {
        if self.fps_log.is_empty() {
            0.0
        } else {
            self.fps_log.iter().sum::<f64>() / self.fps_log.len() as f64
        }
    }

    /// Draw calls issued so far; one per submitted frame.
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({
            "backend": "WebGPU",
            "avg_fps": self.average_fps(),
            "frames_submitted": self.frames_submitted,
            "frames_skipped": self.frames_skipped,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_over_a_sliding_window() {
        let mut stats = FrameStats::new();
        for i in 0..=100 {
            stats.record_frame(i as f64 * 20.0);
        }
        assert_eq!(stats.frames_submitted(), 101);
        assert!((stats.average_fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn first_frame_has_no_rate() {
        let mut stats = FrameStats::new();
        stats.record_frame(16.0);
        assert_eq!(stats.average_fps(), 0.0);
    }
}
