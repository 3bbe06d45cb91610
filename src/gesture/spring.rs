use std::time::Duration;

/// Integration step. Frames are split into 1 ms substeps so the result does
/// not depend on the frame rate.
const STEP_SECS: f32 = 0.001;

/// Longest frame we integrate. A stalled window must not fling the card.
const MAX_FRAME: Duration = Duration::from_millis(64);

/// Physical parameters of a spring (unit mass)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub tension: f32,
    pub friction: f32,
}

impl SpringConfig {
    /// Used to fling a committed card off-screen
    pub const EXIT: SpringConfig = SpringConfig {
        tension: 200.0,
        friction: 20.0,
    };

    /// Used to pull an uncommitted card back to rest
    pub const SETTLE: SpringConfig = SpringConfig {
        tension: 500.0,
        friction: 50.0,
    };
}

/// A single animated value converging on a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringState {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
    /// Distance and speed (units/s) under which the spring counts as at rest
    pub precision: f32,
}

impl SpringState {
    pub fn new(value: f32, precision: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            precision,
        }
    }

    /// Jump to `value` with no motion
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_at_rest(&self) -> bool {
        (self.value - self.target).abs() < self.precision && self.velocity.abs() < self.precision
    }

    /// Advance by `dt`. Snaps to the target once at rest.
    pub fn step(&mut self, config: SpringConfig, dt: Duration) {
        let mut remaining = dt.min(MAX_FRAME).as_secs_f32();
        while remaining > 0.0 && !self.is_at_rest() {
            let h = remaining.min(STEP_SECS);
            let spring = -config.tension * (self.value - self.target);
            let damping = -config.friction * self.velocity;
            self.velocity += (spring + damping) * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if self.is_at_rest() {
            self.set(self.target);
        }
    }
}
