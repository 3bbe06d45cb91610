/// Drag gesture handling for the top card
///
/// The controller turns a pointer stream into live transform values and,
/// once the pointer is released past the commit threshold, a single
/// `SwipeDecision` emitted on the frame the exit animation comes to rest.
/// It knows nothing about the deck: the only thing it hands back is the
/// decision.

pub mod spring;
pub mod velocity;

use std::time::{Duration, Instant};

use tracing::debug;

use crate::state::data::{Direction, SwipeDecision};
use spring::{SpringConfig, SpringState};
use velocity::VelocityTracker;

/// Past this distance a release always commits
pub const COMMIT_DISTANCE: f32 = 200.0;
/// Past this distance a release commits if the pointer is moving fast enough
pub const FLICK_DISTANCE: f32 = 100.0;
/// Minimum speed in px/ms for a flick
pub const FLICK_VELOCITY: f32 = 0.5;
/// Movement below this many pixels is a tap, not a drag
pub const TAP_THRESHOLD: f32 = 3.0;
/// Pixels of offset per degree of rotation while dragging
pub const ROTATION_DIVISOR: f32 = 100.0;
/// Final rotation of a card leaving the screen
pub const EXIT_ROTATION_DEG: f32 = 20.0;
/// Scale of a card while held
pub const DRAG_SCALE: f32 = 1.05;

/// Whether a release at `offset_x` moving at `velocity` px/ms commits the swipe
pub fn should_commit(offset_x: f32, velocity: f32) -> bool {
    let distance = offset_x.abs();
    distance > COMMIT_DISTANCE || (distance > FLICK_DISTANCE && velocity > FLICK_VELOCITY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
    Releasing(Direction),
    SettlingBack,
}

/// What the renderer needs to draw the top card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub offset_x: f32,
    pub rotation_deg: f32,
    pub scale: f32,
}

impl CardTransform {
    pub const REST: CardTransform = CardTransform {
        offset_x: 0.0,
        rotation_deg: 0.0,
        scale: 1.0,
    };
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::REST
    }
}

/// Pointer pressed on the card but not yet moved past the tap threshold
#[derive(Debug, Clone, Copy)]
struct Press {
    origin_x: f32,
    base_offset: f32,
}

#[derive(Debug)]
pub struct GestureController {
    card_id: Option<String>,
    phase: GesturePhase,
    press: Option<Press>,
    offset: SpringState,
    rotation: SpringState,
    scale: SpringState,
    tracker: VelocityTracker,
    last_frame: Option<Instant>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self {
            card_id: None,
            phase: GesturePhase::Idle,
            press: None,
            offset: SpringState::new(0.0, 0.5),
            rotation: SpringState::new(0.0, 0.01),
            scale: SpringState::new(1.0, 0.001),
            tracker: VelocityTracker::new(),
            last_frame: None,
        }
    }

    /// Make `card_id` the active card, abandoning whatever was in progress
    pub fn activate(&mut self, card_id: Option<String>) {
        if self.card_id != card_id {
            debug!("Activating card {:?}", card_id);
        }
        *self = Self {
            card_id,
            ..Self::new()
        };
    }

    pub fn card_id(&self) -> Option<&str> {
        self.card_id.as_deref()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn transform(&self) -> CardTransform {
        CardTransform {
            offset_x: self.offset.value,
            rotation_deg: self.rotation.value,
            scale: self.scale.value,
        }
    }

    /// True while a spring animation needs frame ticks
    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            GesturePhase::Releasing(_) | GesturePhase::SettlingBack
        )
    }

    pub fn pointer_down(&mut self, x: f32, at: Instant) {
        if self.card_id.is_none() || self.press.is_some() {
            return;
        }
        if let GesturePhase::Releasing(_) = self.phase {
            // Card is already retired
            return;
        }

        // A settling card keeps settling until the pointer actually moves
        self.press = Some(Press {
            origin_x: x,
            base_offset: self.offset.value,
        });
        self.tracker.reset();
        self.tracker.push(at, x);
    }

    pub fn pointer_move(&mut self, x: f32, at: Instant) {
        let Some(mut press) = self.press else {
            return;
        };
        self.tracker.push(at, x);

        let delta = x - press.origin_x;
        if self.phase != GesturePhase::Dragging {
            if delta.abs() < TAP_THRESHOLD {
                return;
            }
            if self.phase == GesturePhase::SettlingBack {
                debug!("Card caught while settling");
            } else {
                debug!("Drag started");
            }
            // Continue from wherever the card is now
            press.base_offset = self.offset.value;
            self.press = Some(press);
            self.phase = GesturePhase::Dragging;
            self.last_frame = None;
        }

        self.follow(press.base_offset + delta);
    }

    fn follow(&mut self, offset_x: f32) {
        self.offset.set(offset_x);
        self.rotation.set(offset_x / ROTATION_DIVISOR);
        self.scale.set(DRAG_SCALE);
    }

    /// End the drag. `viewport_width` decides how far a committed card flies.
    pub fn pointer_up(&mut self, x: f32, at: Instant, card_half_width: f32, viewport_width: f32) {
        let Some(press) = self.press.take() else {
            return;
        };
        if self.phase != GesturePhase::Dragging {
            // Tap: nothing moved, nothing changes
            return;
        }

        self.tracker.push(at, x);
        self.follow(press.base_offset + (x - press.origin_x));
        let velocity = self.tracker.velocity();
        let offset_x = self.offset.value;
        self.last_frame = None;

        if should_commit(offset_x, velocity) {
            let direction = Direction::from_offset(offset_x);
            debug!(
                "Committing {:?} swipe (offset {:.0}, velocity {:.2})",
                direction, offset_x, velocity
            );
            self.launch(direction, card_half_width, viewport_width);
        } else {
            debug!(
                "Settling back (offset {:.0}, velocity {:.2})",
                offset_x, velocity
            );
            self.phase = GesturePhase::SettlingBack;
            self.offset.target = 0.0;
            self.rotation.target = 0.0;
            self.scale.target = 1.0;
        }
    }

    /// Commit a swipe without a drag (keyboard shortcut). Ignored unless idle.
    pub fn fling(&mut self, direction: Direction, card_half_width: f32, viewport_width: f32) {
        if self.card_id.is_none() || self.phase != GesturePhase::Idle || self.press.is_some() {
            return;
        }
        self.last_frame = None;
        self.launch(direction, card_half_width, viewport_width);
    }

    fn launch(&mut self, direction: Direction, card_half_width: f32, viewport_width: f32) {
        let sign = direction.sign();
        self.phase = GesturePhase::Releasing(direction);
        self.offset.target = sign * (card_half_width + viewport_width);
        self.rotation.target = sign * EXIT_ROTATION_DEG;
        self.scale.target = 1.0;
    }

    /// Advance animations to the frame at `now`.
    ///
    /// Returns the swipe decision on the frame the exit animation finishes.
    pub fn tick(&mut self, now: Instant) -> Option<SwipeDecision> {
        if !self.is_animating() {
            self.last_frame = None;
            return None;
        }

        let dt = match self.last_frame {
            Some(previous) => now.saturating_duration_since(previous),
            None => Duration::ZERO,
        };
        self.last_frame = Some(now);
        self.advance(dt)
    }

    fn advance(&mut self, dt: Duration) -> Option<SwipeDecision> {
        let config = match self.phase {
            GesturePhase::Releasing(_) => SpringConfig::EXIT,
            GesturePhase::SettlingBack => SpringConfig::SETTLE,
            _ => return None,
        };

        self.offset.step(config, dt);
        self.rotation.step(config, dt);
        self.scale.step(config, dt);

        let settled =
            self.offset.is_at_rest() && self.rotation.is_at_rest() && self.scale.is_at_rest();
        if !settled {
            return None;
        }

        self.last_frame = None;
        match self.phase {
            GesturePhase::Releasing(direction) => {
                self.phase = GesturePhase::Idle;
                let card_id = self.card_id.take()?;
                debug!("Card {} left the screen", card_id);
                Some(SwipeDecision { direction, card_id })
            }
            _ => {
                self.phase = GesturePhase::Idle;
                None
            }
        }
    }
}
