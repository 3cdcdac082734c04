//! Negotiation session management

use crate::error::Result;
use crate::types::{NegotiationId, QuoteRef};
use std::time::SystemTime;

use super::policy::NegotiationPolicy;
use super::types::{Decision, DecisionKind, NegotiationState, NegotiationStatus, Party, Proposal};

/// One negotiation between a buyer and the platform over a single quote
#[derive(Clone, Debug)]
pub struct NegotiationSession {
    id: NegotiationId,
    quote: QuoteRef,
    state: NegotiationState,
    proposals: Vec<Proposal>,
    closed_by: Option<(Party, String)>,
    created_at: SystemTime,
}

impl NegotiationSession {
    /// Create a session around a freshly opened state
    pub fn new(id: NegotiationId, quote: QuoteRef, state: NegotiationState) -> Self {
        let opening = Proposal {
            price: state.current_price(),
            proposer: Party::Platform,
            round: 0,
            timestamp: SystemTime::now(),
        };

        Self {
            id,
            quote,
            state,
            created_at: opening.timestamp,
            proposals: vec![opening],
            closed_by: None,
        }
    }

    /// Get negotiation ID
    pub fn id(&self) -> &NegotiationId {
        &self.id
    }

    /// Get the quote under negotiation
    pub fn quote(&self) -> &QuoteRef {
        &self.quote
    }

    /// When the negotiation was opened
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Get current state
    pub fn state(&self) -> &NegotiationState {
        &self.state
    }

    /// All prices put on the table, opening ask first
    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Who withdrew and why, if the negotiation was withdrawn
    pub fn closed_by(&self) -> Option<&(Party, String)> {
        self.closed_by.as_ref()
    }

    /// Evaluate a buyer offer and commit the result.
    ///
    /// On error the session is left exactly as it was.
    pub fn submit_offer(
        &mut self,
        policy: &NegotiationPolicy,
        buyer_offered_price: i64,
    ) -> Result<Decision> {
        let (next, decision) = policy.evaluate_offer(&self.state, buyer_offered_price)?;

        let now = SystemTime::now();
        self.proposals.push(Proposal {
            price: buyer_offered_price as u64,
            proposer: Party::Buyer,
            round: self.state.round_count(),
            timestamp: now,
        });
        if decision.kind != DecisionKind::Accept {
            self.proposals.push(Proposal {
                price: decision.price.amount(),
                proposer: Party::Platform,
                round: next.round_count(),
                timestamp: now,
            });
        }
        self.state = next;

        Ok(decision)
    }

    /// Withdraw from the negotiation
    pub fn withdraw(
        &mut self,
        policy: &NegotiationPolicy,
        party: Party,
        reason: String,
    ) -> Result<()> {
        self.state = policy.withdraw(&self.state)?;
        self.closed_by = Some((party, reason));
        Ok(())
    }

    /// Check if the buyer and platform agreed on a price
    pub fn is_complete(&self) -> bool {
        self.state.status() == NegotiationStatus::Accepted
    }

    /// Check if negotiation was withdrawn
    pub fn is_withdrawn(&self) -> bool {
        self.state.status() == NegotiationStatus::Rejected
    }

    /// Get the latest proposal price
    pub fn latest_price(&self) -> Option<u64> {
        self.proposals.last().map(|p| p.price)
    }

    /// Agreed price, once accepted
    pub fn agreed_price(&self) -> Option<u64> {
        if self.is_complete() {
            self.latest_price()
        } else {
            None
        }
    }
}
