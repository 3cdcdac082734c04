//! Engine configuration loaded from TOML

use crate::error::{QuoteDeskError, Result};
use crate::negotiation::{NegotiationPolicy, DEFAULT_CONCESSION_BPS, DEFAULT_MAX_ROUNDS};
use crate::pricing::{
    CommissionPolicy, MarginRate, PricingCalculator, RoundingRule, BPS_SCALE, STANDARD_MAX_MARGIN,
    STANDARD_MIN_MARGIN, SURPLUS_DEFAULT_MARGIN,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub pricing: PricingConfig,
    pub negotiation: NegotiationConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// Must be spelled out whenever a `[pricing]` table is present
    #[serde(default)]
    pub rounding: Option<RoundingRule>,
    pub min_margin_bps: u32,
    pub max_margin_bps: u32,
    pub default_margin_bps: u32,
    pub surplus_margin_bps: u32,
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NegotiationConfig {
    pub max_rounds: u32,
    pub concession_bps: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rounding: Some(RoundingRule::HalfUp),
            min_margin_bps: STANDARD_MIN_MARGIN.bps(),
            max_margin_bps: STANDARD_MAX_MARGIN.bps(),
            default_margin_bps: 1_200,
            surplus_margin_bps: SURPLUS_DEFAULT_MARGIN.bps(),
            currency: "USD".to_string(),
        }
    }
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            concession_bps: DEFAULT_CONCESSION_BPS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load from `path`, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<()> {
        let pricing = &self.pricing;
        if pricing.rounding.is_none() {
            return Err(QuoteDeskError::RoundingPolicyUndefined(
                "pricing.rounding must be set to \"half_up\" or \"half_even\"".to_string(),
            ));
        }
        if pricing.max_margin_bps > BPS_SCALE {
            return Err(QuoteDeskError::Configuration(format!(
                "pricing.max_margin_bps must be at most {}, got {}",
                BPS_SCALE, pricing.max_margin_bps
            )));
        }

        self.standard_policy(None).validate()?;
        self.surplus_policy(None).validate()?;

        if self.negotiation.max_rounds == 0 {
            return Err(QuoteDeskError::Configuration(
                "negotiation.max_rounds must be at least 1".to_string(),
            ));
        }
        if self.negotiation.concession_bps > BPS_SCALE {
            return Err(QuoteDeskError::Configuration(format!(
                "negotiation.concession_bps must be at most {}, got {}",
                BPS_SCALE, self.negotiation.concession_bps
            )));
        }

        Ok(())
    }

    pub fn calculator(&self) -> Result<PricingCalculator> {
        PricingCalculator::with_rounding(self.pricing.rounding)
    }

    pub fn negotiation_policy(&self) -> Result<NegotiationPolicy> {
        NegotiationPolicy::new(
            self.calculator()?,
            self.negotiation.max_rounds,
            self.negotiation.concession_bps,
        )
    }

    pub fn min_margin(&self) -> MarginRate {
        MarginRate::from_bps(self.pricing.min_margin_bps)
    }

    /// Standard-channel policy at `margin`, or the configured default
    pub fn standard_policy(&self, margin: Option<MarginRate>) -> CommissionPolicy {
        self.policy_at(margin.unwrap_or(MarginRate::from_bps(self.pricing.default_margin_bps)))
    }

    /// Surplus-channel policy at `margin`, or the configured surplus default
    pub fn surplus_policy(&self, margin: Option<MarginRate>) -> CommissionPolicy {
        self.policy_at(margin.unwrap_or(MarginRate::from_bps(self.pricing.surplus_margin_bps)))
    }

    fn policy_at(&self, margin: MarginRate) -> CommissionPolicy {
        CommissionPolicy::new(
            margin,
            MarginRate::from_bps(self.pricing.min_margin_bps),
            MarginRate::from_bps(self.pricing.max_margin_bps),
        )
    }
}
