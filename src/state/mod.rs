/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The deck, cursor and liked cats of the current session (session.rs)

pub mod data;
pub mod session;
