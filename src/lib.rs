//! QuoteDesk pricing and negotiation engine
//!
//! Turns hidden per-unit costs into a single buyer-visible price and runs
//! bounded negotiations against a margin floor:
//! - Pricing calculator with a fixed rounding rule and surplus markdowns
//! - Negotiation policy (accept / counter / stalemate) over a state machine
//! - Session registry and a narrow text-rendering seam for buyer copy
//!
//! Only [`BuyerPrice`] and [`Decision`] are meant to reach a buyer; neither
//! carries subtotal, commission or cost fields.

pub mod cli;
pub mod config;
pub mod error;
pub mod narration;
pub mod negotiation;
pub mod pricing;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{QuoteDeskError, Result};
pub use narration::{OfferNarrator, TemplateNarrator};
pub use negotiation::{
    Decision, DecisionKind, NegotiationEngine, NegotiationPolicy, NegotiationState,
    NegotiationStatus, Party,
};
pub use pricing::{
    format_for_buyer, BuyerPrice, CommissionPolicy, CostInputs, MarginRate, PriceBreakdown,
    PricingCalculator, RoundingRule,
};
pub use types::{NegotiationId, QuoteRef};
