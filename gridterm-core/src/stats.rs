use std::time::{Duration, Instant};

/// Per-frame timings and a rolling frames-per-second counter
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Frames completed during the last full interval
    pub fps: u32,
    /// Frames completed in the current interval so far
    pub frame_count: u32,
    pub last_delta_ms: f64,
    pub update_ms: f64,
    pub render_ms: f64,
    interval_start: Instant,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            fps: 0,
            frame_count: 0,
            last_delta_ms: 0.0,
            update_ms: 0.0,
            render_ms: 0.0,
            interval_start: now,
        }
    }

    /// Count a finished frame; publishes `fps` once `interval` has elapsed
    ///
    /// Returns `true` when a new fps value was published.
    pub fn tick(&mut self, now: Instant, interval: Duration) -> bool {
        self.frame_count += 1;
        if now.saturating_duration_since(self.interval_start) >= interval {
            self.fps = self.frame_count;
            self.frame_count = 0;
            self.interval_start = now;
            return true;
        }
        false
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_published_per_interval() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        let interval = Duration::from_secs(1);

        for i in 1..60 {
            assert!(!stats.tick(start + Duration::from_millis(i * 16), interval));
        }
        assert_eq!(stats.fps, 0);
        assert_eq!(stats.frame_count, 59);

        assert!(stats.tick(start + Duration::from_millis(1001), interval));
        assert_eq!(stats.fps, 60);
        assert_eq!(stats.frame_count, 0);
    }
}
