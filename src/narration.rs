//! Turning decisions into buyer-facing copy.
//!
//! A narrator only ever receives a [`Decision`], so whatever produces the
//! text (templates here, a language model elsewhere) cannot see the hidden
//! breakdown.

use crate::negotiation::{Decision, DecisionKind};

/// Renders a negotiation decision as text for the buyer
pub trait OfferNarrator: Send + Sync {
    fn narrate(&self, decision: &Decision) -> String;
}

/// Fixed English templates
#[derive(Clone, Debug)]
pub struct TemplateNarrator {
    currency: String,
}

impl TemplateNarrator {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }
}

impl Default for TemplateNarrator {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl OfferNarrator for TemplateNarrator {
    fn narrate(&self, decision: &Decision) -> String {
        match decision.kind {
            DecisionKind::Accept => format!(
                "Agreed. We accept your offer of {} {} per unit.",
                decision.price, self.currency
            ),
            DecisionKind::Counter => format!(
                "We can't go that low, but we can offer {} {} per unit.",
                decision.price, self.currency
            ),
            DecisionKind::Stalemate => format!(
                "Our final offer is {} {} per unit. We are unable to go lower.",
                decision.price, self.currency
            ),
        }
    }
}
