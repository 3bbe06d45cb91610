/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the image source, the session and the UI layer.

/// Represents a single cat card in the deck
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardItem {
    /// Unique id within one deck (upstream id or synthesized)
    pub id: String,
    /// Remote URL of the cat picture
    pub image_url: String,
}

impl CardItem {
    pub fn new(id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_url: image_url.into(),
        }
    }
}

/// Which way a card was swiped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Pass
    Left,
    /// Like
    Right,
}

impl Direction {
    /// Direction of a horizontal displacement (non-negative counts as right)
    pub fn from_offset(offset_x: f32) -> Self {
        if offset_x < 0.0 {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// -1.0 for left, 1.0 for right
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// The committed outcome for one card, emitted after its exit animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeDecision {
    pub direction: Direction,
    pub card_id: String,
}
