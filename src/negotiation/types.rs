//! Negotiation types and state machine

use crate::error::Result;
use crate::pricing::{BuyerPrice, MarginRate, PriceBreakdown};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Party in a negotiation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Party {
    Buyer,
    Platform,
}

/// Lifecycle status of a negotiation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationStatus {
    /// Created, no counter issued yet
    Open,
    /// Engine proposed a price and awaits the buyer
    Countered,
    Accepted,
    /// No convergent counter left inside the round budget
    Stalemate,
    /// Withdrawn by either party
    Rejected,
}

impl NegotiationStatus {
    /// Check if negotiation is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NegotiationStatus::Accepted | NegotiationStatus::Stalemate | NegotiationStatus::Rejected
        )
    }

    /// Check if negotiation is active
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

/// Seller-side record of one negotiation.
///
/// Holds the hidden subtotal and margins, so it never crosses to the buyer.
/// Only the negotiation policy can produce a successor state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NegotiationState {
    pub(crate) subtotal: u64,
    pub(crate) floor_margin: MarginRate,
    pub(crate) current_margin: MarginRate,
    pub(crate) current_price: u64,
    pub(crate) floor_price: u64,
    pub(crate) round_count: u32,
    pub(crate) status: NegotiationStatus,
}

impl NegotiationState {
    pub(crate) fn new(opening: &PriceBreakdown, floor: &PriceBreakdown) -> Self {
        Self {
            subtotal: opening.subtotal(),
            floor_margin: floor.margin(),
            current_margin: opening.margin(),
            current_price: opening.final_price(),
            floor_price: floor.final_price(),
            round_count: 0,
            status: NegotiationStatus::Open,
        }
    }

    /// Engine's last offered final price
    pub fn current_price(&self) -> u64 {
        self.current_price
    }

    /// Lowest final price the engine will ever accept
    pub fn floor_price(&self) -> u64 {
        self.floor_price
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn status(&self) -> NegotiationStatus {
        self.status
    }

    pub fn floor_margin(&self) -> MarginRate {
        self.floor_margin
    }

    pub fn current_margin(&self) -> MarginRate {
        self.current_margin
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Outcome kind of evaluating a buyer offer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Accept,
    Counter,
    Stalemate,
}

/// What the buyer (and any text renderer) is told.
///
/// Exactly two fields. There is no subtotal, commission or cost here to leak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub kind: DecisionKind,
    pub price: BuyerPrice,
}

impl Decision {
    pub(crate) fn new(kind: DecisionKind, price: u64) -> Self {
        Self {
            kind,
            price: BuyerPrice::new(price),
        }
    }

    /// Buyer-facing JSON form: `{"kind":"counter","price":1046}`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A price put on the table during negotiation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub price: u64,
    pub proposer: Party,
    pub round: u32,
    pub timestamp: SystemTime,
}
