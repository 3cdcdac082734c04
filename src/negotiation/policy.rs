//! Negotiation policy: accept, counter or stalemate.
//!
//! Counters concede part of the gap between the engine's ask and the
//! buyer's offer (or the floor, when the offer is below it). The share the
//! engine keeps shrinks linearly with the round number:
//!
//! ```text
//! retain(round) = concession_bps * (max_rounds - round) / max_rounds
//! desired       = target + (current - target) * retain / 10_000
//! ```
//!
//! The counter is then the price at the smallest margin whose final price
//! reaches `desired`, so every emitted price is a real calculator output.
//! Since `current` only ever moves down and the round count is capped, a
//! negotiation always ends within `max_rounds` counters.

use crate::error::{QuoteDeskError, Result};
use crate::pricing::{MarginRate, PriceBreakdown, PricingCalculator, BPS_SCALE};

use super::types::{Decision, DecisionKind, NegotiationState, NegotiationStatus};

/// Default cap on engine counters per negotiation
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// Default share of the gap the engine keeps on the first counter (50%)
pub const DEFAULT_CONCESSION_BPS: u32 = 5_000;

/// Decision rules for one channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NegotiationPolicy {
    calculator: PricingCalculator,
    max_rounds: u32,
    concession_bps: u32,
}

impl NegotiationPolicy {
    pub fn new(
        calculator: PricingCalculator,
        max_rounds: u32,
        concession_bps: u32,
    ) -> Result<Self> {
        if max_rounds == 0 {
            return Err(QuoteDeskError::Configuration("max_rounds must be at least 1".to_string()));
        }
        if concession_bps > BPS_SCALE {
            return Err(QuoteDeskError::Configuration(format!(
                "concession_bps must be at most {}, got {}",
                BPS_SCALE, concession_bps
            )));
        }

        Ok(Self {
            calculator,
            max_rounds,
            concession_bps,
        })
    }

    pub fn calculator(&self) -> &PricingCalculator {
        &self.calculator
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Open a negotiation against an issued quote.
    ///
    /// The floor is the quote's subtotal priced at `min_margin` and stays
    /// fixed for the life of the negotiation.
    pub fn create_negotiation(
        &self,
        initial: &PriceBreakdown,
        min_margin: MarginRate,
    ) -> Result<NegotiationState> {
        if min_margin > initial.margin() {
            return Err(QuoteDeskError::PolicyViolation(format!(
                "minimum margin {} exceeds quoted margin {}",
                min_margin,
                initial.margin()
            )));
        }

        let opening = self.calculator.price_subtotal(initial.subtotal(), initial.margin())?;
        if opening != *initial {
            return Err(QuoteDeskError::InvalidInput(
                "breakdown was not produced with this calculator's rounding rule".to_string(),
            ));
        }
        let floor = self.calculator.price_subtotal(initial.subtotal(), min_margin)?;

        tracing::debug!(
            "Negotiation opened: ask {} floor {} ({} .. {})",
            opening.final_price(),
            floor.final_price(),
            min_margin,
            initial.margin()
        );

        Ok(NegotiationState::new(&opening, &floor))
    }

    /// Evaluate a buyer offer against `state`.
    ///
    /// Returns the successor state and the buyer-facing decision. `state`
    /// is untouched; on error nothing changes.
    pub fn evaluate_offer(
        &self,
        state: &NegotiationState,
        buyer_offered_price: i64,
    ) -> Result<(NegotiationState, Decision)> {
        if state.is_terminal() {
            return Err(QuoteDeskError::InvalidTransition(format!(
                "cannot evaluate an offer on a {:?} negotiation",
                state.status
            )));
        }
        if buyer_offered_price < 0 {
            return Err(QuoteDeskError::InvalidInput(format!(
                "offer must be non-negative, got {}",
                buyer_offered_price
            )));
        }
        let offer = buyer_offered_price as u64;
        let mut next = state.clone();

        if offer >= state.current_price {
            next.status = NegotiationStatus::Accepted;
            return Ok((next, Decision::new(DecisionKind::Accept, offer)));
        }

        if offer >= state.floor_price {
            if state.round_count >= self.max_rounds {
                // Out of counters but the offer clears the floor
                next.status = NegotiationStatus::Accepted;
                return Ok((next, Decision::new(DecisionKind::Accept, offer)));
            }

            let desired = self.desired_price(state, offer).max(offer + 1);
            let counter = self.smallest_price_at_least(state, desired)?;
            if counter.final_price() >= state.current_price {
                // Gap too narrow to split at whole-bps resolution
                next.status = NegotiationStatus::Accepted;
                return Ok((next, Decision::new(DecisionKind::Accept, offer)));
            }

            return Ok(self.counter(next, &counter));
        }

        if state.round_count >= self.max_rounds {
            next.status = NegotiationStatus::Stalemate;
            next.current_price = state.floor_price;
            next.current_margin = state.floor_margin;
            return Ok((next, Decision::new(DecisionKind::Stalemate, state.floor_price)));
        }

        let desired = self.desired_price(state, state.floor_price);
        let counter = self.smallest_price_at_least(state, desired)?;
        Ok(self.counter(next, &counter))
    }

    /// Terminate a live negotiation on behalf of either party
    pub fn withdraw(&self, state: &NegotiationState) -> Result<NegotiationState> {
        if state.is_terminal() {
            return Err(QuoteDeskError::InvalidTransition(format!(
                "cannot withdraw from a {:?} negotiation",
                state.status
            )));
        }

        let mut next = state.clone();
        next.status = NegotiationStatus::Rejected;
        Ok(next)
    }

    fn counter(
        &self,
        mut next: NegotiationState,
        counter: &PriceBreakdown,
    ) -> (NegotiationState, Decision) {
        next.current_price = counter.final_price();
        next.current_margin = counter.margin();
        next.round_count += 1;
        next.status = NegotiationStatus::Countered;
        (next, Decision::new(DecisionKind::Counter, counter.final_price()))
    }

    /// `target + (current - target) * retain(round)`, rounded down
    fn desired_price(&self, state: &NegotiationState, target: u64) -> u64 {
        let remaining = (self.max_rounds - state.round_count.min(self.max_rounds)) as u128;
        let retain_bps = self.concession_bps as u128 * remaining / self.max_rounds as u128;
        let gap = (state.current_price - target) as u128;
        target + (gap * retain_bps / BPS_SCALE as u128) as u64
    }

    /// Price at the lowest margin in `[floor_margin, current_margin]` whose
    /// final price is at least `min_price`.
    ///
    /// `min_price` never exceeds the current ask, and the current ask is the
    /// price at `current_margin`, so a match always exists.
    fn smallest_price_at_least(
        &self,
        state: &NegotiationState,
        min_price: u64,
    ) -> Result<PriceBreakdown> {
        let mut low = state.floor_margin.bps();
        let mut high = state.current_margin.bps();

        while low < high {
            let mid = low + (high - low) / 2;
            let price = self.calculator.price_subtotal(state.subtotal, MarginRate::from_bps(mid))?;
            if price.final_price() >= min_price {
                high = mid;
            } else {
                low = mid + 1;
            }
        }

        self.calculator.price_subtotal(state.subtotal, MarginRate::from_bps(low))
    }
}

impl Default for NegotiationPolicy {
    fn default() -> Self {
        Self {
            calculator: PricingCalculator::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            concession_bps: DEFAULT_CONCESSION_BPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{CommissionPolicy, CostInputs, RoundingRule};

    /// Ask 1092, floor 950: subtotal 950 quoted at 14.95%, floor margin 0
    fn reference_state(policy: &NegotiationPolicy) -> NegotiationState {
        let initial = policy
            .calculator()
            .price_subtotal(950, MarginRate::from_bps(1495))
            .unwrap();
        policy.create_negotiation(&initial, MarginRate::from_bps(0)).unwrap()
    }

    fn standard_state(policy: &NegotiationPolicy) -> NegotiationState {
        let costs = CostInputs {
            supplier_price: 850,
            shipping: 50,
            taxes: 35,
            fees: 25,
            tariffs: 15,
        };
        let initial = policy
            .calculator()
            .compute_price(&costs, &CommissionPolicy::standard(MarginRate::from_percent(12)))
            .unwrap();
        policy.create_negotiation(&initial, MarginRate::from_percent(5)).unwrap()
    }

    #[test]
    fn test_create_negotiation() {
        let policy = NegotiationPolicy::default();
        let state = reference_state(&policy);

        assert_eq!(state.current_price(), 1092);
        assert_eq!(state.floor_price(), 950);
        assert_eq!(state.status(), NegotiationStatus::Open);
    }

    #[test]
    fn test_create_rejects_floor_above_quote() {
        let policy = NegotiationPolicy::default();
        let initial = policy
            .calculator()
            .price_subtotal(975, MarginRate::from_percent(10))
            .unwrap();

        let result = policy.create_negotiation(&initial, MarginRate::from_percent(12));
        assert!(matches!(result, Err(QuoteDeskError::PolicyViolation(_))));
    }

    #[test]
    fn test_create_rejects_foreign_rounding() {
        let half_up = NegotiationPolicy::default();
        let half_even_calc = PricingCalculator::new(RoundingRule::HalfEven);
        let half_even = NegotiationPolicy::new(half_even_calc, 5, 5_000).unwrap();

        // 550 at 15% ties: 633 half-up, 632 half-even
        let initial = half_up
            .calculator()
            .price_subtotal(550, MarginRate::from_percent(15))
            .unwrap();

        let result = half_even.create_negotiation(&initial, MarginRate::from_percent(5));
        assert!(matches!(result, Err(QuoteDeskError::InvalidInput(_))));
    }

    #[test]
    fn test_offer_at_ask_accepted() {
        let policy = NegotiationPolicy::default();
        let state = reference_state(&policy);

        let (next, decision) = policy.evaluate_offer(&state, 1092).unwrap();

        assert_eq!(decision.kind, DecisionKind::Accept);
        assert_eq!(decision.price.amount(), 1092);
        assert_eq!(next.status(), NegotiationStatus::Accepted);
    }

    #[test]
    fn test_offer_above_ask_accepted_at_offer() {
        let policy = NegotiationPolicy::default();
        let state = reference_state(&policy);

        let (_, decision) = policy.evaluate_offer(&state, 1200).unwrap();
        assert_eq!(decision.kind, DecisionKind::Accept);
        assert_eq!(decision.price.amount(), 1200);
    }

    #[test]
    fn test_offer_between_floor_and_ask_countered() {
        let policy = NegotiationPolicy::default();
        let state = reference_state(&policy);

        let (next, decision) = policy.evaluate_offer(&state, 1000).unwrap();

        assert_eq!(decision.kind, DecisionKind::Counter);
        let price = decision.price.amount();
        assert!(price > 1000 && price < 1092, "counter {} not in (1000, 1092)", price);
        assert_eq!(price, 1046);
        assert_eq!(next.status(), NegotiationStatus::Countered);
        assert_eq!(next.round_count(), 1);
        assert_eq!(next.current_price(), price);
        assert_eq!(next.floor_price(), 950);
    }

    #[test]
    fn test_offer_below_floor_countered_at_floor_bound() {
        let policy = NegotiationPolicy::default();
        let state = reference_state(&policy);

        let (next, decision) = policy.evaluate_offer(&state, 900).unwrap();

        assert_eq!(decision.kind, DecisionKind::Counter);
        assert!(decision.price.amount() >= 950);
        assert!(decision.price.amount() <= 1092);
        assert_eq!(next.round_count(), 1);
    }

    #[test]
    fn test_offer_below_floor_after_max_rounds_is_stalemate() {
        let policy = NegotiationPolicy::new(PricingCalculator::default(), 2, 5_000).unwrap();
        let mut state = reference_state(&policy);

        for _ in 0..2 {
            let (next, decision) = policy.evaluate_offer(&state, 900).unwrap();
            assert_eq!(decision.kind, DecisionKind::Counter);
            state = next;
        }

        let (next, decision) = policy.evaluate_offer(&state, 900).unwrap();
        assert_eq!(decision.kind, DecisionKind::Stalemate);
        assert_eq!(decision.price.amount(), 950);
        assert_eq!(next.status(), NegotiationStatus::Stalemate);
        assert_eq!(next.current_price(), 950);
        assert_eq!(next.round_count(), 2);
    }

    #[test]
    fn test_counter_prices_are_calculator_outputs() {
        let policy = NegotiationPolicy::default();
        let mut state = standard_state(&policy);

        let mut offer = 1030;
        while !state.is_terminal() {
            let (next, _) = policy.evaluate_offer(&state, offer).unwrap();
            let repriced = policy
                .calculator()
                .price_subtotal(975, next.current_margin())
                .unwrap();
            assert_eq!(repriced.final_price(), next.current_price());
            assert!(next.current_margin() >= MarginRate::from_percent(5));
            assert!(next.current_margin() <= MarginRate::from_percent(12));
            state = next;
            offer += 5;
        }
    }

    #[test]
    fn test_convergence_from_any_offer_above_floor() {
        let policy = NegotiationPolicy::default();
        let start = standard_state(&policy);

        for offer in start.floor_price()..=start.current_price() {
            let mut state = start.clone();
            let mut evaluations = 0;
            while !state.is_terminal() {
                let (next, _) = policy.evaluate_offer(&state, offer as i64).unwrap();
                state = next;
                evaluations += 1;
                assert!(evaluations <= policy.max_rounds() + 1);
            }
            assert_eq!(state.status(), NegotiationStatus::Accepted);
        }
    }

    #[test]
    fn test_floor_safety_and_monotone_ask() {
        let policy = NegotiationPolicy::new(PricingCalculator::default(), 8, 7_500).unwrap();
        let offers = [0, 500, 1020, 1024, 1030, 1010, 1060, 1_000_000];

        for first in offers {
            for second in offers {
                let mut state = standard_state(&policy);
                let mut previous_round = state.round_count();
                for offer in [first, second].repeat(5) {
                    if state.is_terminal() {
                        break;
                    }
                    let previous_ask = state.current_price();
                    let (next, decision) = policy.evaluate_offer(&state, offer).unwrap();

                    assert!(next.current_price() >= next.floor_price());
                    assert!(next.current_price() <= previous_ask);
                    assert!(next.round_count() <= policy.max_rounds());
                    if decision.kind == DecisionKind::Counter {
                        assert!(next.round_count() > previous_round);
                        assert!(decision.price.amount() >= next.floor_price());
                    }
                    previous_round = next.round_count();
                    state = next;
                }
            }
        }
    }

    #[test]
    fn test_concession_grows_with_rounds() {
        let policy = NegotiationPolicy::default();
        let mut state = reference_state(&policy);

        let mut kept = Vec::new();
        for _ in 0..3 {
            let before = state.current_price();
            let (next, decision) = policy.evaluate_offer(&state, 960).unwrap();
            assert_eq!(decision.kind, DecisionKind::Counter);
            // share of the gap the engine held on to, in bps
            kept.push((decision.price.amount() - 960) * 10_000 / (before - 960));
            state = next;
        }

        assert!(kept[0] > kept[1]);
        assert!(kept[1] > kept[2]);
    }

    #[test]
    fn test_narrow_gap_accepts_offer() {
        let policy = NegotiationPolicy::default();
        let state = reference_state(&policy);

        let (next, decision) = policy.evaluate_offer(&state, 1091).unwrap();
        assert_eq!(decision.kind, DecisionKind::Accept);
        assert_eq!(decision.price.amount(), 1091);
        assert_eq!(next.status(), NegotiationStatus::Accepted);
    }

    #[test]
    fn test_negative_offer_rejected_without_mutation() {
        let policy = NegotiationPolicy::default();
        let state = reference_state(&policy);
        let snapshot = state.clone();

        let result = policy.evaluate_offer(&state, -1);
        assert!(matches!(result, Err(QuoteDeskError::InvalidInput(_))));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        let policy = NegotiationPolicy::default();
        let state = reference_state(&policy);

        let (accepted, _) = policy.evaluate_offer(&state, 1092).unwrap();
        assert!(matches!(
            policy.evaluate_offer(&accepted, 1000),
            Err(QuoteDeskError::InvalidTransition(_))
        ));
        assert!(matches!(policy.withdraw(&accepted), Err(QuoteDeskError::InvalidTransition(_))));

        let rejected = policy.withdraw(&state).unwrap();
        assert_eq!(rejected.status(), NegotiationStatus::Rejected);
        assert!(matches!(
            policy.evaluate_offer(&rejected, 1092),
            Err(QuoteDeskError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_withdraw_from_countered() {
        let policy = NegotiationPolicy::default();
        let state = reference_state(&policy);

        let (countered, _) = policy.evaluate_offer(&state, 1000).unwrap();
        let rejected = policy.withdraw(&countered).unwrap();

        assert_eq!(rejected.status(), NegotiationStatus::Rejected);
        assert_eq!(rejected.current_price(), countered.current_price());
    }

    #[test]
    fn test_zero_subtotal_accepts_any_offer() {
        let policy = NegotiationPolicy::default();
        let initial = policy.calculator().price_subtotal(0, MarginRate::from_percent(12)).unwrap();
        let state = policy.create_negotiation(&initial, MarginRate::from_percent(5)).unwrap();

        let (next, decision) = policy.evaluate_offer(&state, 0).unwrap();
        assert_eq!(decision.kind, DecisionKind::Accept);
        assert_eq!(next.status(), NegotiationStatus::Accepted);
    }

    #[test]
    fn test_policy_configuration_checked() {
        assert!(matches!(
            NegotiationPolicy::new(PricingCalculator::default(), 0, 5_000),
            Err(QuoteDeskError::Configuration(_))
        ));
        assert!(matches!(
            NegotiationPolicy::new(PricingCalculator::default(), 5, 10_001),
            Err(QuoteDeskError::Configuration(_))
        ));
    }
}
