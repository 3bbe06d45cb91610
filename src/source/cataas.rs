use chrono::Utc;
use tracing::warn;

use super::ids::{synthesize_id, IdMinter};
use crate::state::data::CardItem;

/// Requested edge length of a Cataas picture
const CATAAS_SIZE: u32 = 400;

/// Cataas random-image endpoint.
///
/// Every URL yields a different random cat, so the deck is built locally
/// with synthesized ids and cache-busting URLs; the pictures themselves are
/// fetched when the cards are downloaded.
#[derive(Debug, Clone)]
pub struct Cataas {
    endpoint: String,
}

impl Cataas {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn fetch(&self, count: usize) -> Vec<CardItem> {
        let mut rng = fastrand::Rng::new();
        self.build_deck(count, Utc::now().timestamp_millis(), &mut rng)
    }

    fn build_deck(&self, count: usize, now_millis: i64, rng: &mut fastrand::Rng) -> Vec<CardItem> {
        let mut minter = IdMinter::new(count);
        let mut cards = Vec::with_capacity(count);

        for i in 0..count {
            let Some(id) = minter.mint(|| synthesize_id(now_millis, rng)) else {
                warn!("Could not mint a unique id, stopping at {} cats", cards.len());
                break;
            };
            let url = format!(
                "{}/cat?width={CATAAS_SIZE}&height={CATAAS_SIZE}&_={}",
                self.endpoint,
                now_millis + i as i64
            );
            cards.push(CardItem::new(id, url));
        }

        cards
    }
}
