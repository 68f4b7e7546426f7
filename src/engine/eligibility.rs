//! Eligibility gating
//!
//! Predicates deciding whether the accept / offer / request actions are
//! available to the current session. No session is a normal state that
//! disables actions, never an error. The gate holds no memory; callers
//! recompute it from current state before presenting action controls.

use crate::engine::quantities::AccountSnapshot;
use crate::engine::rules;
use crate::models::Resource;

/// Whether the session account may accept an offer.
///
/// `target_resource` is the resource name behind the offer's target asset,
/// when it could be resolved. A zero target quantity (free offer) is always
/// acceptable quantity-wise; otherwise the account's aggregated quantity of
/// the target resource must cover one exchange unit.
pub fn can_accept_offer(
    account: Option<&AccountSnapshot>,
    target_resource: Option<&str>,
    target_quantity: u64,
) -> bool {
    let Some(account) = account else {
        return false;
    };
    if target_quantity == 0 {
        return true;
    }
    let Some(resource) = target_resource else {
        return false;
    };
    account.quantity_of(resource) >= target_quantity
}

/// Whether the session account may publish an offer of a resource.
///
/// Requires a session, a nonzero aggregated quantity of the resource, and
/// transferability (non-transferable resources can only be offered by
/// their owners).
pub fn can_offer_resource(account: Option<&AccountSnapshot>, resource: &Resource) -> bool {
    let Some(account) = account else {
        return false;
    };
    account.quantity_of(&resource.name) > 0
        && rules::is_transferable(
            &resource.rules,
            &account.account.public_key,
            &resource.owners,
        )
}

/// Whether the session account may request a resource. Gated solely on
/// the presence of a session.
pub fn can_request_resource(account: Option<&AccountSnapshot>) -> bool {
    account.is_some()
}
