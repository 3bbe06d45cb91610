/// User interface components
///
/// - The swipeable card stage drawn on a canvas (card.rs)
/// - The end-of-session summary (results.rs)
/// - Palette and container styles (style.rs)

pub mod card;
pub mod results;
pub mod style;
