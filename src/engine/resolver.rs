//! Exchange count resolution
//!
//! Translates a user-edited input quantity into the canonical exchange
//! count and the paired quantities the acceptance submits. The resolution
//! is a pure function of its inputs and is re-run on every edit; downstream
//! submission uses its output, never the raw input.

use crate::engine::rules;
use crate::models::{Offer, Rule};

/// The per-unit exchange ratio defined by an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeTerms {
    /// Units of the offered resource given per exchange
    pub source_quantity: u64,
    /// Units of the requested resource owed per exchange; 0 when free
    pub target_quantity: u64,
}

impl From<&Offer> for ExchangeTerms {
    fn from(offer: &Offer) -> Self {
        Self {
            source_quantity: offer.source_quantity,
            target_quantity: offer.target_quantity,
        }
    }
}

/// A resolved exchange: the legal count and the quantities it moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedExchange {
    pub count: u64,
    /// Quantity of the offered resource actually received, `count`
    /// units of `source_quantity`
    pub input_quantity: u64,
    /// Quantity of the requested resource actually owed, `count`
    /// units of `target_quantity`
    pub output_quantity: u64,
}

/// Resolve an input quantity against the offer's terms, rules, and the
/// capacity caps of both sides.
///
/// `in_max` is the giver's legally available quantity of the offered
/// resource and `out_max` the acceptor's available quantity of the
/// requested resource, both already widened to `u64::MAX` when an
/// infinite-supply rule applies (see [`rules::available_quantity`]).
///
/// Resolution order:
/// 1. whole units fitting the input quantity,
/// 2. any nonzero input rounds up to at least one unit,
/// 3. an exchange-once rule clamps to one unit,
/// 4. the giver's capacity clamps the count,
/// 5. the acceptor's capacity clamps the count (skipped for free offers).
///
/// All clamps saturate toward zero; the function never panics. Offers with
/// a zero source quantity are rejected at creation, so such terms resolve
/// to the zero exchange here rather than dividing by zero.
pub fn resolve_exchange(
    input_quantity: u64,
    terms: ExchangeTerms,
    offer_rules: &[Rule],
    in_max: u64,
    out_max: u64,
) -> ResolvedExchange {
    if terms.source_quantity == 0 {
        return ResolvedExchange::default();
    }

    let mut count = input_quantity / terms.source_quantity;
    if input_quantity != 0 {
        count = count.max(1);
    }

    if let Some(limit) = rules::max_exchange_count(offer_rules) {
        count = count.min(limit);
    }

    count = count.min(in_max / terms.source_quantity);
    if terms.target_quantity != 0 {
        count = count.min(out_max / terms.target_quantity);
    }

    ResolvedExchange {
        count,
        input_quantity: count * terms.source_quantity,
        output_quantity: count * terms.target_quantity,
    }
}
