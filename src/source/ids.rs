use std::collections::HashSet;

/// Hands out card ids that are unique within one fetch.
///
/// Each fetch builds its own minter, so uniqueness state never outlives
/// the call that needs it.
#[derive(Debug)]
pub struct IdMinter {
    seen: HashSet<String>,
    attempts_left: usize,
}

impl IdMinter {
    /// `attempt_budget` bounds how many candidates may be rejected in total
    pub fn new(attempt_budget: usize) -> Self {
        Self {
            seen: HashSet::new(),
            attempts_left: attempt_budget,
        }
    }

    /// Accept `id` if it has not been seen. Returns `false` for duplicates.
    pub fn claim(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_string())
    }

    /// Draw candidates from `generate` until one is new.
    ///
    /// Every rejected candidate spends one attempt from the shared budget;
    /// `None` means the budget ran out.
    pub fn mint(&mut self, mut generate: impl FnMut() -> String) -> Option<String> {
        loop {
            let candidate = generate();
            if self.claim(&candidate) {
                return Some(candidate);
            }
            if self.attempts_left == 0 {
                return None;
            }
            self.attempts_left -= 1;
        }
    }

    /// Spend one attempt for a retry that is not an id draw (an upstream re-request)
    pub fn spend_attempt(&mut self) -> bool {
        if self.attempts_left == 0 {
            return false;
        }
        self.attempts_left -= 1;
        true
    }
}

/// `cat-{unix_millis}-{8 base36 chars}`
pub fn synthesize_id(unix_millis: i64, rng: &mut fastrand::Rng) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let suffix: String = (0..8)
        .map(|_| ALPHABET[rng.usize(..ALPHABET.len())] as char)
        .collect();
    format!("cat-{unix_millis}-{suffix}")
}
