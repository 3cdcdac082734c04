//! QuoteDesk application integrating pricing, negotiation and narration

use crate::config::EngineConfig;
use crate::error::Result;
use crate::narration::{OfferNarrator, TemplateNarrator};
use crate::negotiation::{Decision, NegotiationEngine, NegotiationState, Party};
use crate::pricing::{CostInputs, MarginRate, PriceBreakdown, PricingCalculator};
use crate::types::{NegotiationId, QuoteRef};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Main QuoteDesk application.
///
/// The engine sits behind one lock, so offers on the same negotiation are
/// always applied one at a time.
#[derive(Clone)]
pub struct QuoteDeskApp {
    config: Arc<EngineConfig>,
    calculator: PricingCalculator,
    negotiation: Arc<Mutex<NegotiationEngine>>,
    narrator: Arc<dyn OfferNarrator>,
}

/// A decision plus the copy shown to the buyer
#[derive(Clone, Debug)]
pub struct BuyerReply {
    pub decision: Decision,
    pub message: String,
}

impl QuoteDeskApp {
    /// Create a new application from validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        let narrator = TemplateNarrator::new(config.pricing.currency.clone());
        Self::with_narrator(config, Arc::new(narrator))
    }

    /// Create with a custom text renderer
    pub fn with_narrator(config: EngineConfig, narrator: Arc<dyn OfferNarrator>) -> Result<Self> {
        config.validate()?;
        let calculator = config.calculator()?;
        let engine = NegotiationEngine::new(config.negotiation_policy()?);

        Ok(Self {
            config: Arc::new(config),
            calculator,
            negotiation: Arc::new(Mutex::new(engine)),
            narrator,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get negotiation engine
    pub fn negotiation(&self) -> Arc<Mutex<NegotiationEngine>> {
        self.negotiation.clone()
    }

    /// Price a standard quote
    pub fn quote(&self, costs: &CostInputs, margin: Option<MarginRate>) -> Result<PriceBreakdown> {
        let policy = self.config.standard_policy(margin);
        let breakdown = self.calculator.compute_price(costs, &policy)?;
        tracing::info!("Quoted {}", breakdown.buyer_price());
        tracing::debug!("Quote margin {}", policy.margin);
        Ok(breakdown)
    }

    /// Price a surplus quote
    pub fn surplus_quote(
        &self,
        base_price: i64,
        discount_percent: u32,
        costs: &CostInputs,
        margin: Option<MarginRate>,
    ) -> Result<PriceBreakdown> {
        let policy = self.config.surplus_policy(margin);
        let breakdown =
            self.calculator
                .compute_surplus_price(base_price, discount_percent, costs, &policy)?;
        tracing::info!(
            "Quoted surplus {} ({}% off)",
            breakdown.buyer_price(),
            discount_percent
        );
        tracing::debug!("Surplus quote margin {}", policy.margin);
        Ok(breakdown)
    }

    /// Start a negotiation on a priced quote
    pub async fn open_negotiation(
        &self,
        quote: QuoteRef,
        breakdown: &PriceBreakdown,
        min_margin: Option<MarginRate>,
    ) -> Result<NegotiationId> {
        let min_margin = min_margin.unwrap_or_else(|| self.config.min_margin());
        self.negotiation.lock().await.open(quote, breakdown, min_margin)
    }

    /// Evaluate a buyer offer and render the reply
    pub async fn submit_offer(&self, id: &NegotiationId, offer: i64) -> Result<BuyerReply> {
        let decision = self.negotiation.lock().await.evaluate_offer(id, offer)?;
        Ok(BuyerReply {
            decision,
            message: self.narrator.narrate(&decision),
        })
    }

    /// Withdraw a negotiation
    pub async fn withdraw(&self, id: &NegotiationId, party: Party, reason: String) -> Result<()> {
        self.negotiation.lock().await.withdraw(id, party, reason)
    }

    /// Snapshot of a negotiation's state (seller side)
    pub async fn negotiation_state(&self, id: &NegotiationId) -> Result<NegotiationState> {
        self.negotiation.lock().await.state(id).cloned()
    }
}
