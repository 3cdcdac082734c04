//! Negotiation module: bounded, convergent haggling above a margin floor

pub mod engine;
pub mod policy;
pub mod session;
pub mod types;

pub use engine::NegotiationEngine;
pub use policy::{NegotiationPolicy, DEFAULT_CONCESSION_BPS, DEFAULT_MAX_ROUNDS};
pub use session::NegotiationSession;
pub use types::{Decision, DecisionKind, NegotiationState, NegotiationStatus, Party, Proposal};
