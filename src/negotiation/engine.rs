//! Negotiation engine manages all active negotiation sessions

use crate::error::{QuoteDeskError, Result};
use crate::pricing::{MarginRate, PriceBreakdown};
use crate::types::{NegotiationId, QuoteRef};
use std::collections::HashMap;

use super::policy::NegotiationPolicy;
use super::session::NegotiationSession;
use super::types::{Decision, NegotiationState, Party};

/// Negotiation engine manages all sessions under one policy
pub struct NegotiationEngine {
    policy: NegotiationPolicy,
    sessions: HashMap<NegotiationId, NegotiationSession>,
}

impl NegotiationEngine {
    /// Create new negotiation engine
    pub fn new(policy: NegotiationPolicy) -> Self {
        Self {
            policy,
            sessions: HashMap::new(),
        }
    }

    pub fn policy(&self) -> &NegotiationPolicy {
        &self.policy
    }

    /// Open a negotiation when a buyer first proposes against a quote
    pub fn open(
        &mut self,
        quote: QuoteRef,
        initial: &PriceBreakdown,
        min_margin: MarginRate,
    ) -> Result<NegotiationId> {
        let state = self.policy.create_negotiation(initial, min_margin)?;
        let id = NegotiationId::generate(&quote);

        tracing::info!("Opened negotiation {} on quote {}", id, quote);

        self.sessions
            .insert(id.clone(), NegotiationSession::new(id.clone(), quote, state));
        Ok(id)
    }

    /// Evaluate a buyer offer on an open negotiation
    pub fn evaluate_offer(
        &mut self,
        id: &NegotiationId,
        buyer_offered_price: i64,
    ) -> Result<Decision> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| QuoteDeskError::NegotiationNotFound(id.0.clone()))?;

        let decision = match session.submit_offer(&self.policy, buyer_offered_price) {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!("Offer on negotiation {} refused: {}", id, e);
                return Err(e);
            }
        };

        tracing::info!(
            "Negotiation {} round {}: {:?} at {}",
            id,
            session.state().round_count(),
            decision.kind,
            decision.price
        );
        tracing::debug!(
            "Negotiation {} ask {} floor {}",
            id,
            session.state().current_price(),
            session.state().floor_price()
        );

        Ok(decision)
    }

    /// Withdraw a negotiation on behalf of either party
    pub fn withdraw(&mut self, id: &NegotiationId, party: Party, reason: String) -> Result<()> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| QuoteDeskError::NegotiationNotFound(id.0.clone()))?;

        if let Err(e) = session.withdraw(&self.policy, party, reason.clone()) {
            tracing::warn!("Withdrawal from negotiation {} refused: {}", id, e);
            return Err(e);
        }

        tracing::info!("Negotiation {} withdrawn by {:?}: {}", id, party, reason);
        Ok(())
    }

    /// Get a session
    pub fn get_session(&self, id: &NegotiationId) -> Option<&NegotiationSession> {
        self.sessions.get(id)
    }

    /// Current state of a negotiation
    pub fn state(&self, id: &NegotiationId) -> Result<&NegotiationState> {
        self.sessions
            .get(id)
            .map(NegotiationSession::state)
            .ok_or_else(|| QuoteDeskError::NegotiationNotFound(id.0.clone()))
    }

    /// Sessions that have not reached a terminal state
    pub fn active_sessions(&self) -> impl Iterator<Item = &NegotiationSession> {
        self.sessions.values().filter(|s| !s.state().is_terminal())
    }

    /// Every session, terminal or not
    pub fn sessions(&self) -> &HashMap<NegotiationId, NegotiationSession> {
        &self.sessions
    }
}

impl Default for NegotiationEngine {
    fn default() -> Self {
        Self::new(NegotiationPolicy::default())
    }
}
