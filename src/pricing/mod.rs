//! Pricing module: hidden costs in, one buyer-visible price out

pub mod calculator;
pub mod rounding;
pub mod types;

pub use calculator::{
    format_for_buyer, PricingCalculator, MAX_SURPLUS_DISCOUNT, MIN_SURPLUS_DISCOUNT,
};
pub use rounding::RoundingRule;
pub use types::{
    BuyerPrice, CommissionPolicy, CostInputs, MarginRate, PriceBreakdown, BPS_SCALE,
    STANDARD_MAX_MARGIN, STANDARD_MIN_MARGIN, SURPLUS_DEFAULT_MARGIN,
};
