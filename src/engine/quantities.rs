//! Resource quantity aggregation
//!
//! Collapses an account's asset list into one best-available quantity per
//! resource. The policy is the maximum single-asset quantity, not the sum:
//! an exchange draws from one asset, so capacity is bounded by the largest
//! holding of the resource.

use std::collections::HashMap;

use crate::models::{Account, Asset};

/// Fold an asset list into a resource -> best quantity mapping.
///
/// The first asset of a resource seeds the value; later assets of the same
/// resource only raise it. An empty asset list yields an empty map, and
/// downstream consumers treat absent resources as quantity 0.
pub fn resource_quantities(assets: &[Asset]) -> HashMap<String, u64> {
    assets.iter().fold(HashMap::new(), |mut quantities, asset| {
        quantities
            .entry(asset.resource.clone())
            .and_modify(|quantity| *quantity = (*quantity).max(asset.quantity))
            .or_insert(asset.quantity);
        quantities
    })
}

/// An account paired with its aggregated per-resource quantities.
///
/// This is the read-only view the eligibility gate consumes. It is built
/// fresh from a fetched account; the quantities are never written back.
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    pub account: Account,
    pub quantities: HashMap<String, u64>,
}

impl AccountSnapshot {
    pub fn of(account: Account) -> Self {
        let quantities = resource_quantities(&account.assets);
        Self {
            account,
            quantities,
        }
    }

    /// Best available quantity of a resource, 0 when none is held.
    pub fn quantity_of(&self, resource: &str) -> u64 {
        self.quantities.get(resource).copied().unwrap_or(0)
    }
}
