use std::fmt;
use std::sync::Arc;

use crate::errors::AuthError;

pub use bcrypt::DEFAULT_COST;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Input hashed once at construction so unknown-user logins pay the same
/// verification cost as real ones.
const DUMMY_PASSWORD: &str = "estore-timing-equalizer";

/// bcrypt hashing with a fixed work factor.
///
/// Both operations are CPU bound; async callers should run them on the
/// blocking pool.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<str>,
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AuthError::HashingFailure(format!(
                "bcrypt cost {cost} outside {MIN_COST}..={MAX_COST}"
            )));
        }

        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost)
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?;

        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| AuthError::HashingFailure(e.to_string()))
    }

    /// Returns `Ok(false)` on mismatch and `MalformedHash` when `hash` is not
    /// a bcrypt digest.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(plaintext, hash).map_err(|_| AuthError::MalformedHash)
    }

    /// Burns one verification against a throwaway hash of the same cost.
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = bcrypt::verify(plaintext, &self.dummy_hash);
    }
}
