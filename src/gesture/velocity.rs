use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Samples older than this do not contribute to the release velocity
const WINDOW: Duration = Duration::from_millis(100);

/// Tracks recent pointer positions to estimate horizontal speed in px/ms
#[derive(Debug, Default, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<(Instant, f32)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn push(&mut self, at: Instant, x: f32) {
        self.samples.push_back((at, x));
        while let Some(&(oldest, _)) = self.samples.front() {
            if at.saturating_duration_since(oldest) > WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Absolute horizontal speed over the window, in px/ms.
    ///
    /// Zero with fewer than two samples, so a pointer that paused before
    /// release reports no velocity.
    pub fn velocity(&self) -> f32 {
        let (Some(&(t0, x0)), Some(&(t1, x1))) = (self.samples.front(), self.samples.back()) else {
            return 0.0;
        };

        let elapsed_ms = t1.saturating_duration_since(t0).as_secs_f32() * 1_000.0;
        if elapsed_ms <= f32::EPSILON {
            return 0.0;
        }
        ((x1 - x0) / elapsed_ms).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_motion() {
        let t0 = Instant::now();
        let mut tracker = VelocityTracker::new();
        for i in 0..10u64 {
            tracker.push(t0 + Duration::from_millis(i * 20), i as f32 * 12.0);
        }
        assert!((tracker.velocity() - 0.6).abs() < 1e-3);
    }

    #[test]
    fn test_leftward_motion_is_absolute() {
        let t0 = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.push(t0, 0.0);
        tracker.push(t0 + Duration::from_millis(50), -40.0);
        assert!((tracker.velocity() - 0.8).abs() < 1e-3);
    }

    #[test]
    fn test_pause_drops_velocity() {
        let t0 = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.push(t0, 0.0);
        tracker.push(t0 + Duration::from_millis(10), 50.0);
        tracker.push(t0 + Duration::from_millis(500), 50.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn test_single_sample() {
        let mut tracker = VelocityTracker::new();
        tracker.push(Instant::now(), 10.0);
        assert_eq!(tracker.velocity(), 0.0);
    }
}
