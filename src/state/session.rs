use tracing::{debug, info, warn};

use super::data::{CardItem, Direction, SwipeDecision};
use crate::error::FetchError;

/// Identifies one load request. Completions from older generations are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Where the session currently stands, derived from the stored fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// A load is in flight
    Loading,
    /// The last load failed; carries the message shown to the user
    Error(String),
    /// The last load succeeded with zero cards
    Empty,
    /// There is a card at the cursor
    Active,
    /// Every card has been swiped
    Complete,
}

/// One load-through-completion cycle over a fixed deck.
///
/// The deck is never mutated after `load`; only the cursor moves.
#[derive(Debug, Default)]
pub struct Session {
    deck: Vec<CardItem>,
    cursor: usize,
    liked: Vec<CardItem>,
    error: Option<FetchError>,
    generation: u64,
    in_flight: Option<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load and return its ticket.
    ///
    /// Any earlier load still in flight becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.error = None;
        self.deck.clear();
        self.cursor = 0;
        self.liked.clear();
        info!("🐾 Starting load #{}", self.generation);
        LoadTicket(self.generation)
    }

    /// Whether `ticket` belongs to the most recent load
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply the outcome of a load. Returns `false` if the ticket is stale
    /// and the result was discarded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<CardItem>, FetchError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale load #{} (current is #{})",
                ticket.0, self.generation
            );
            return false;
        }

        self.in_flight = None;
        match result {
            Ok(items) => {
                info!("Loaded {} cats", items.len());
                self.load(items);
            }
            Err(err) => {
                warn!("Load #{} failed: {}", ticket.0, err);
                self.deck.clear();
                self.cursor = 0;
                self.liked.clear();
                self.error = Some(err);
            }
        }
        true
    }

    /// Replace the deck, rewind the cursor and forget the previous session
    pub fn load(&mut self, items: Vec<CardItem>) {
        self.deck = items;
        self.cursor = 0;
        self.liked.clear();
        self.error = None;
    }

    /// Record a swipe on the card at the cursor and advance.
    ///
    /// Returns the card that was swiped, or `None` if the deck is exhausted.
    pub fn record_swipe(&mut self, direction: Direction) -> Option<&CardItem> {
        if self.cursor >= self.deck.len() {
            return None;
        }

        let index = self.cursor;
        if direction == Direction::Right {
            self.liked.push(self.deck[index].clone());
        }
        self.cursor += 1;
        debug!(
            "Swiped {:?} on {} ({}/{})",
            direction,
            self.deck[index].id,
            self.cursor,
            self.deck.len()
        );
        Some(&self.deck[index])
    }

    /// Record a decision only if it refers to the card at the cursor.
    ///
    /// Decisions for retired or unknown cards are ignored, so each card
    /// advances the cursor at most once.
    pub fn apply_decision(&mut self, decision: &SwipeDecision) -> bool {
        match self.current() {
            Some(card) if card.id == decision.card_id => {
                self.record_swipe(decision.direction);
                true
            }
            _ => {
                warn!("Ignoring decision for card {} (not on top)", decision.card_id);
                false
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.deck.len() && !self.is_loading()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_loading() {
            SessionPhase::Loading
        } else if let Some(err) = &self.error {
            SessionPhase::Error(err.to_string())
        } else if self.deck.is_empty() {
            SessionPhase::Empty
        } else if self.is_complete() {
            SessionPhase::Complete
        } else {
            SessionPhase::Active
        }
    }

    /// The top card, if any
    pub fn current(&self) -> Option<&CardItem> {
        self.deck.get(self.cursor)
    }

    /// The card underneath the top card, if any
    pub fn upcoming(&self) -> Option<&CardItem> {
        self.deck.get(self.cursor + 1)
    }

    pub fn deck(&self) -> &[CardItem] {
        &self.deck
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn liked(&self) -> &[CardItem] {
        &self.liked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn deck(ids: &[&str]) -> Vec<CardItem> {
        ids.iter()
            .map(|id| CardItem::new(*id, format!("https://cats.test/{id}.jpg")))
            .collect()
    }

    fn loaded(ids: &[&str]) -> Session {
        let mut session = Session::new();
        let ticket = session.begin_load();
        assert!(session.finish_load(ticket, Ok(deck(ids))));
        session
    }

    #[test]
    fn test_right_swipes_are_liked() {
        let mut session = loaded(&["a", "b", "c"]);

        session.record_swipe(Direction::Right);
        session.record_swipe(Direction::Left);

        assert_eq!(session.cursor(), 2);
        assert_eq!(session.liked(), &deck(&["a"])[..]);
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_complete_after_last_card() {
        let mut session = loaded(&["a", "b"]);
        session.record_swipe(Direction::Left);
        assert!(!session.is_complete());
        session.record_swipe(Direction::Right);

        assert!(session.is_complete());
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert!(session.current().is_none());
        assert!(session.record_swipe(Direction::Right).is_none());
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn test_restart_resets_cursor_and_likes() {
        let mut session = loaded(&["a", "b"]);
        session.record_swipe(Direction::Right);
        session.record_swipe(Direction::Right);

        let ticket = session.begin_load();
        assert_eq!(session.cursor(), 0);
        assert!(session.liked().is_empty());
        assert_eq!(session.phase(), SessionPhase::Loading);

        session.finish_load(ticket, Ok(deck(&["x"])));
        assert_eq!(session.cursor(), 0);
        assert!(session.liked().is_empty());
        assert_eq!(session.current().map(|c| c.id.as_str()), Some("x"));
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut session = Session::new();
        let first = session.begin_load();
        let second = session.begin_load();

        assert!(!session.finish_load(first, Ok(deck(&["old"]))));
        assert!(session.is_loading());

        assert!(session.finish_load(second, Ok(deck(&["new"]))));
        assert_eq!(session.deck(), &deck(&["new"])[..]);

        // A late failure from the first load must not clobber the deck either
        assert!(!session.finish_load(first, Err(FetchError::Network("late".into()))));
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_empty_is_not_error() {
        let mut session = Session::new();
        let ticket = session.begin_load();
        session.finish_load(ticket, Ok(Vec::new()));
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn test_error_message_is_verbatim() {
        let mut session = Session::new();
        let ticket = session.begin_load();
        let err = FetchError::Network("connection reset by peer".into());
        session.finish_load(ticket, Err(err.clone()));

        assert_eq!(session.phase(), SessionPhase::Error(err.to_string()));

        // Retry re-issues the load and clears the error
        let retry = session.begin_load();
        assert_eq!(session.phase(), SessionPhase::Loading);
        session.finish_load(retry, Ok(deck(&["a"])));
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_decision_for_other_card_is_ignored() {
        let mut session = loaded(&["a", "b"]);
        let stale = SwipeDecision {
            direction: Direction::Right,
            card_id: "b".into(),
        };
        assert!(!session.apply_decision(&stale));
        assert_eq!(session.cursor(), 0);

        let decision = SwipeDecision {
            direction: Direction::Right,
            card_id: "a".into(),
        };
        assert!(session.apply_decision(&decision));
        assert!(!session.apply_decision(&decision));
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.liked().len(), 1);
    }
}
