//! Pricing types: cost inputs, commission policy and the two price views

use crate::error::{QuoteDeskError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basis points in one whole (100%)
pub const BPS_SCALE: u32 = 10_000;

/// Lowest margin the standard channel allows (5%)
pub const STANDARD_MIN_MARGIN: MarginRate = MarginRate(500);

/// Highest margin the standard channel allows (15%)
pub const STANDARD_MAX_MARGIN: MarginRate = MarginRate(1_500);

/// Default margin on surplus inventory (15%)
pub const SURPLUS_DEFAULT_MARGIN: MarginRate = MarginRate(1_500);

/// Commission rate in basis points (1% = 100 bps)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarginRate(pub u32);

impl MarginRate {
    /// Whole-percent constructor: `from_percent(12)` is 1200 bps
    pub const fn from_percent(percent: u32) -> Self {
        MarginRate(percent * 100)
    }

    pub const fn from_bps(bps: u32) -> Self {
        MarginRate(bps)
    }

    pub fn bps(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MarginRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// Per-unit cost inputs in minor currency units (cents).
///
/// Signed so that a bad upstream value arrives here and is rejected
/// instead of wrapping silently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostInputs {
    pub supplier_price: i64,
    pub shipping: i64,
    pub taxes: i64,
    pub fees: i64,
    pub tariffs: i64,
}

impl CostInputs {
    /// Check every field is non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.fields() {
            if value < 0 {
                return Err(QuoteDeskError::InvalidInput(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Copy of these costs with a different supplier price
    pub fn with_supplier_price(&self, supplier_price: i64) -> Self {
        Self {
            supplier_price,
            ..*self
        }
    }

    /// Sum of all fields, overflow-checked
    pub fn subtotal(&self) -> Result<u64> {
        self.validate()?;
        self.fields()
            .iter()
            .try_fold(0u64, |acc, (_, value)| acc.checked_add(*value as u64))
            .ok_or_else(|| QuoteDeskError::InvalidInput("cost subtotal overflows".to_string()))
    }

    fn fields(&self) -> [(&'static str, i64); 5] {
        [
            ("supplier_price", self.supplier_price),
            ("shipping", self.shipping),
            ("taxes", self.taxes),
            ("fees", self.fees),
            ("tariffs", self.tariffs),
        ]
    }
}

/// Margin the platform takes on a quote, with the range it must sit in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionPolicy {
    pub margin: MarginRate,
    pub min_margin: MarginRate,
    pub max_margin: MarginRate,
}

impl CommissionPolicy {
    pub fn new(margin: MarginRate, min_margin: MarginRate, max_margin: MarginRate) -> Self {
        Self {
            margin,
            min_margin,
            max_margin,
        }
    }

    /// Policy within the standard 5-15% channel range
    pub fn standard(margin: MarginRate) -> Self {
        Self::new(margin, STANDARD_MIN_MARGIN, STANDARD_MAX_MARGIN)
    }

    /// Surplus channel default (15%)
    pub fn surplus() -> Self {
        Self::standard(SURPLUS_DEFAULT_MARGIN)
    }

    /// Reject margins outside the closed range. Never clamps.
    pub fn validate(&self) -> Result<()> {
        if self.min_margin > self.max_margin {
            return Err(QuoteDeskError::PolicyViolation(format!(
                "minimum margin {} exceeds maximum margin {}",
                self.min_margin, self.max_margin
            )));
        }
        if self.margin < self.min_margin || self.margin > self.max_margin {
            return Err(QuoteDeskError::PolicyViolation(format!(
                "margin {} outside [{}, {}]",
                self.margin, self.min_margin, self.max_margin
            )));
        }
        Ok(())
    }
}

/// Internal price derivation. Never leaves the seller side.
///
/// Fields are private so the only way to build one is through the
/// calculator, which keeps `final_price == subtotal + commission`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    subtotal: u64,
    commission: u64,
    final_price: u64,
    margin: MarginRate,
}

impl PriceBreakdown {
    pub(crate) fn new(
        subtotal: u64,
        commission: u64,
        final_price: u64,
        margin: MarginRate,
    ) -> Self {
        Self {
            subtotal,
            commission,
            final_price,
            margin,
        }
    }

    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    pub fn commission(&self) -> u64 {
        self.commission
    }

    pub fn final_price(&self) -> u64 {
        self.final_price
    }

    pub fn margin(&self) -> MarginRate {
        self.margin
    }

    /// The buyer-facing view: the final price and nothing else
    pub fn buyer_price(&self) -> BuyerPrice {
        BuyerPrice(self.final_price)
    }
}

/// A price as a buyer may see it.
///
/// Strictly smaller than [`PriceBreakdown`]: it holds one amount and has no
/// path back to subtotal, commission or any cost field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuyerPrice(u64);

impl BuyerPrice {
    pub(crate) fn new(amount: u64) -> Self {
        BuyerPrice(amount)
    }

    /// Amount in minor units
    pub fn amount(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BuyerPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::calculator::format_for_buyer(self.0))
    }
}
