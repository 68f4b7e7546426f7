//! Shared test helpers for marketplace client tests
//!
//! Constants and builders used across the unit tests: dummy identities,
//! ledger-style UUIDs, and model constructors.

#![allow(dead_code)]

use rand::RngCore;
use uuid::Uuid;

use marketplace_client::models::{Account, Asset, Offer, OfferStatus, Resource, Rule};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Dummy public key for the session account (hex, 66 chars)
pub const DUMMY_KEY_USER: &str =
    "02aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// Dummy public key for an offer/resource owner (hex, 66 chars)
pub const DUMMY_KEY_OWNER: &str =
    "02bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

/// Dummy public key for a third account (hex, 66 chars)
pub const DUMMY_KEY_OTHER: &str =
    "02cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

/// Dummy offer id
pub const DUMMY_OFFER_ID: &str = "11111111-1111-1111-1111-111111111111";

/// Dummy asset ids
pub const DUMMY_ASSET_SOURCE: &str = "22222222-2222-2222-2222-222222222222";
pub const DUMMY_ASSET_TARGET: &str = "33333333-3333-3333-3333-333333333333";
pub const DUMMY_ASSET_USER_RECEIVE: &str = "44444444-4444-4444-4444-444444444444";
pub const DUMMY_ASSET_USER_PAY: &str = "55555555-5555-5555-5555-555555555555";

// ============================================================================
// BUILDERS
// ============================================================================

pub fn id(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap()
}

/// A random well-formed public key (hex, 66 chars).
pub fn random_public_key() -> String {
    let mut bytes = [0u8; 33];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn asset(asset_id: &str, account: &str, resource: &str, quantity: u64) -> Asset {
    Asset {
        id: id(asset_id),
        label: None,
        description: None,
        account: account.to_string(),
        resource: resource.to_string(),
        quantity,
    }
}

pub fn account(public_key: &str, assets: Vec<Asset>) -> Account {
    Account {
        public_key: public_key.to_string(),
        label: None,
        description: None,
        assets,
    }
}

pub fn resource(name: &str, owners: &[&str], rules: Vec<Rule>) -> Resource {
    Resource {
        name: name.to_string(),
        description: None,
        owners: owners.iter().map(|owner| owner.to_string()).collect(),
        rules,
    }
}

/// An open offer from the dummy owner: `source_quantity` of the source
/// asset per exchange, against `target_quantity` into the target asset.
pub fn offer(source_quantity: u64, target: Option<&str>, target_quantity: u64) -> Offer {
    Offer {
        id: id(DUMMY_OFFER_ID),
        label: None,
        description: None,
        owners: vec![DUMMY_KEY_OWNER.to_string()],
        source: id(DUMMY_ASSET_SOURCE),
        source_quantity,
        target: target.map(id),
        target_quantity,
        rules: Vec::new(),
        status: OfferStatus::Open,
    }
}
