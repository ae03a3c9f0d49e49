//! Short identifier generation for todos
//!
//! Ids are six lowercase hex characters derived from a SHA-256 digest of
//! the title, the current time and a random salt. Callers check each
//! candidate for collisions and ask for the next one when needed.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a generated id in characters
pub const ID_LENGTH: usize = 6;

/// Candidates produced before giving up
pub const MAX_ATTEMPTS: usize = 16;

/// Produces candidate ids for a new todo
#[derive(Debug)]
pub struct IdGenerator {
    seed: String,
    attempts: usize,
}

impl IdGenerator {
    /// Create a generator seeded with the todo title
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            attempts: 0,
        }
    }

    /// Next candidate id, or None once the attempt budget is spent
    pub fn next_id(&mut self) -> Option<String> {
        if self.attempts >= MAX_ATTEMPTS {
            return None;
        }
        self.attempts += 1;

        let salt: u64 = rand::rng().random();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(nanos.to_le_bytes());
        hasher.update(salt.to_le_bytes());
        let digest = hasher.finalize();

        Some(
            digest
                .iter()
                .take(ID_LENGTH / 2)
                .map(|b| format!("{:02x}", b))
                .collect(),
        )
    }
}
