use std::time::Duration;

/// Counts rendered frames and reports the total once per elapsed second.
///
/// The report timestamp advances by exactly the interval rather than
/// resetting to "now", so a slow second does not shift every later report.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: Duration,
    last_report: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Create a counter anchored at `now`.
    pub fn new(now: Duration) -> Self {
        Self {
            interval: Duration::from_secs(1),
            last_report: now,
            frames: 0,
        }
    }

    /// Count one frame. Returns the accumulated frame total when a full
    /// interval has elapsed since the last report; the counter resets to 0
    /// afterwards.
    pub fn record_frame(&mut self, now: Duration) -> Option<u32> {
        self.frames += 1;

        if now.saturating_sub(self.last_report) >= self.interval {
            self.last_report += self.interval;
            let frames = self.frames;
            self.frames = 0;
            Some(frames)
        } else {
            None
        }
    }

    /// Re-anchor at `now` and discard any accumulated frames.
    pub fn reset(&mut self, now: Duration) {
        self.last_report = now;
        self.frames = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn no_report_before_interval_elapses() {
        let mut fps = FpsCounter::new(at_millis(0));

        assert_eq!(fps.record_frame(at_millis(100)), None);
        assert_eq!(fps.record_frame(at_millis(500)), None);
        assert_eq!(fps.record_frame(at_millis(999)), None);
    }

    #[test]
    fn reports_accumulated_frames_after_one_second() {
        let mut fps = FpsCounter::new(at_millis(0));

        for ms in [200, 400, 600, 800] {
            assert_eq!(fps.record_frame(at_millis(ms)), None);
        }

        assert_eq!(fps.record_frame(at_millis(1000)), Some(5));
    }

    #[test]
    fn counter_resets_after_each_report() {
        let mut fps = FpsCounter::new(at_millis(0));

        assert_eq!(fps.record_frame(at_millis(1000)), Some(1));
        assert_eq!(fps.record_frame(at_millis(1500)), None);
        assert_eq!(fps.record_frame(at_millis(2000)), Some(2));
    }

    #[test]
    fn slow_second_does_not_drift_later_reports() {
        let mut fps = FpsCounter::new(at_millis(0));

        // A stalled host crosses the boundary late; the next report window
        // still starts at 1000, not at 1700.
        assert_eq!(fps.record_frame(at_millis(1700)), Some(1));
        assert_eq!(fps.record_frame(at_millis(2000)), Some(1));
    }

    #[test]
    fn reset_discards_frames_and_reanchors() {
        let mut fps = FpsCounter::new(at_millis(0));

        assert_eq!(fps.record_frame(at_millis(900)), None);
        fps.reset(at_millis(5000));

        assert_eq!(fps.record_frame(at_millis(5999)), None);
        assert_eq!(fps.record_frame(at_millis(6000)), Some(2));
    }
}
