//! Cost-to-price calculator

use crate::error::{QuoteDeskError, Result};

use super::rounding::RoundingRule;
use super::types::{CommissionPolicy, CostInputs, MarginRate, PriceBreakdown, BPS_SCALE};

/// Smallest surplus markdown, in whole percent
pub const MIN_SURPLUS_DISCOUNT: u32 = 30;

/// Largest surplus markdown, in whole percent
pub const MAX_SURPLUS_DISCOUNT: u32 = 50;

/// Deterministic pricing pipeline with a rounding rule fixed at construction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricingCalculator {
    rounding: RoundingRule,
}

impl PricingCalculator {
    pub fn new(rounding: RoundingRule) -> Self {
        Self { rounding }
    }

    /// Build from an optional rule; a calculator without one cannot exist
    pub fn with_rounding(rounding: Option<RoundingRule>) -> Result<Self> {
        rounding.map(Self::new).ok_or_else(|| {
            QuoteDeskError::RoundingPolicyUndefined(
                "commission rounding rule must be set to half_up or half_even".to_string(),
            )
        })
    }

    pub fn rounding(&self) -> RoundingRule {
        self.rounding
    }

    /// Aggregate costs and add commission
    pub fn compute_price(
        &self,
        costs: &CostInputs,
        policy: &CommissionPolicy,
    ) -> Result<PriceBreakdown> {
        let subtotal = costs.subtotal()?;
        policy.validate()?;
        self.price_subtotal(subtotal, policy.margin)
    }

    /// Mark down a supplier price by a surplus discount, ties rounding up
    pub fn apply_surplus_discount(&self, base_price: i64, discount_percent: u32) -> Result<i64> {
        if base_price < 0 {
            return Err(QuoteDeskError::InvalidInput(format!(
                "base price must be non-negative, got {}",
                base_price
            )));
        }
        if !(MIN_SURPLUS_DISCOUNT..=MAX_SURPLUS_DISCOUNT).contains(&discount_percent) {
            return Err(QuoteDeskError::InvalidInput(format!(
                "surplus discount {}% outside [{}%, {}%]",
                discount_percent, MIN_SURPLUS_DISCOUNT, MAX_SURPLUS_DISCOUNT
            )));
        }

        let kept = base_price as u128 * (100 - discount_percent) as u128;
        let discounted = RoundingRule::HalfUp.divide(kept, 100);

        // Never larger than base_price, so it fits back into i64
        Ok(discounted as i64)
    }

    /// Discount the supplier price, then run the ordinary pipeline.
    ///
    /// `costs.supplier_price` is replaced by the discounted `base_price`.
    pub fn compute_surplus_price(
        &self,
        base_price: i64,
        discount_percent: u32,
        costs: &CostInputs,
        policy: &CommissionPolicy,
    ) -> Result<PriceBreakdown> {
        let discounted = self.apply_surplus_discount(base_price, discount_percent)?;
        tracing::debug!(
            "Surplus discount {}% on {} -> {}",
            discount_percent,
            base_price,
            discounted
        );

        self.compute_price(&costs.with_supplier_price(discounted), policy)
    }

    /// Price an already-aggregated subtotal at `margin`.
    ///
    /// Shared by quoting and negotiation so every price the engine emits
    /// comes out of the same arithmetic.
    pub(crate) fn price_subtotal(
        &self,
        subtotal: u64,
        margin: MarginRate,
    ) -> Result<PriceBreakdown> {
        let scaled = subtotal as u128 * margin.bps() as u128;
        let commission = u64::try_from(self.rounding.divide(scaled, BPS_SCALE as u128))
            .map_err(|_| QuoteDeskError::InvalidInput("commission overflows".to_string()))?;
        let final_price = subtotal
            .checked_add(commission)
            .ok_or_else(|| QuoteDeskError::InvalidInput("final price overflows".to_string()))?;

        Ok(PriceBreakdown::new(subtotal, commission, final_price, margin))
    }
}

impl Default for PricingCalculator {
    fn default() -> Self {
        Self::new(RoundingRule::HalfUp)
    }
}

/// Render minor units as a major-unit string with two decimals (1092 -> "10.92").
///
/// The only way an internal amount is meant to reach a buyer.
pub fn format_for_buyer(final_price: u64) -> String {
    format!("{}.{:02}", final_price / 100, final_price % 100)
}
