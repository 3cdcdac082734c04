//! Identifiers shared across QuoteDesk

use blake2::{Blake2b512, Digest};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to the quote a negotiation is held against (owned by the quoting workflow)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteRef(pub String);

impl QuoteRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }
}

impl fmt::Display for QuoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a negotiation session
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NegotiationId(pub String);

impl NegotiationId {
    /// Derive a fresh id from the quote reference and a random salt
    pub fn generate(quote: &QuoteRef) -> Self {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::derive(quote, &salt)
    }

    /// Deterministic id: Hash(quote || salt), first 12 bytes
    pub fn derive(quote: &QuoteRef, salt: &[u8]) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update(quote.0.as_bytes());
        hasher.update(salt);
        let result = hasher.finalize();
        Self(format!("neg_{}", hex::encode(&result[..12])))
    }
}

impl fmt::Display for NegotiationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
