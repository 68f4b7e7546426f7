//! Rule evaluation
//!
//! Declarative constraint queries over a rule set and an exchange context.
//! Rules arrive attached to a resource or an offer and are matched
//! exhaustively on the closed [`Rule`] enum; evaluation never mutates its
//! inputs and never re-derives rules imperatively.

use crate::models::Rule;

/// True when the rule set declares every asset of the resource infinite.
pub fn is_all_infinite(rules: &[Rule]) -> bool {
    rules.iter().any(|rule| matches!(rule, Rule::AllAssetsInfinite))
}

/// True when the rule set declares owner-held assets infinite and the
/// acting account is the resource's primary owner.
///
/// Ownership here means the first entry of the owners sequence; resources
/// with several owners are treated as owned by their primary owner for
/// this check.
pub fn is_owner_infinite(rules: &[Rule], acting_key: &str, owners: &[String]) -> bool {
    rules.iter().any(|rule| matches!(rule, Rule::OwnerAssetsInfinite))
        && owners.first().is_some_and(|primary| primary == acting_key)
}

/// Upper bound on the exchange count imposed by the rule set, if any.
///
/// Both exchange-once variants clamp to a single unit here. Per-account
/// acceptance history is enforced by the ledger at settlement, not by
/// this client-side evaluator.
pub fn max_exchange_count(rules: &[Rule]) -> Option<u64> {
    rules
        .iter()
        .any(|rule| matches!(rule, Rule::ExchangeOnce | Rule::ExchangeOncePerAccount))
        .then_some(1)
}

/// True unless an allow-list rule excludes the acting account.
///
/// When several allow-list rules are attached the key must appear in every
/// one of them (the lists intersect).
pub fn is_account_allowed(rules: &[Rule], acting_key: &str) -> bool {
    rules.iter().all(|rule| match rule {
        Rule::ExchangeLimitedToAccounts(keys) => keys.contains(acting_key),
        _ => true,
    })
}

/// True unless the resource is non-transferable for the acting account.
///
/// Non-transferability only binds accounts outside the resource's owners
/// list; any listed owner may still offer the resource.
pub fn is_transferable(rules: &[Rule], acting_key: &str, owners: &[String]) -> bool {
    let restricted = rules.iter().any(|rule| matches!(rule, Rule::NotTransferable));
    !restricted || owners.iter().any(|owner| owner == acting_key)
}

/// Quantity of an asset legally available to its holder under the
/// resource's rules.
///
/// Returns the `u64::MAX` sentinel when an infinite-supply rule applies to
/// the holder, otherwise the asset's actual quantity. This feeds the
/// resolver's capacity clamps.
pub fn available_quantity(
    quantity: u64,
    rules: &[Rule],
    holder_key: &str,
    owners: &[String],
) -> u64 {
    if is_all_infinite(rules) || is_owner_infinite(rules, holder_key, owners) {
        u64::MAX
    } else {
        quantity
    }
}
