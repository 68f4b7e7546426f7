//! Wire types for the marketplace ledger REST API
//!
//! These structures mirror the JSON the ledger's REST gateway produces and
//! consumes. Field names on the wire are camelCase; quantities are unsigned
//! integers. Assets and offers are identified by ledger-minted UUIDs, while
//! accounts are identified by their hex public key and resources by name.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// LEDGER STATE
// ============================================================================

/// A quantity of one resource held by one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Ledger-minted identifier
    pub id: Uuid,
    /// Optional display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public key of the owning account (absent on freshly created assets)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account: String,
    /// Name of the resource this asset is a quantity of
    pub resource: String,
    /// Current quantity, mutated only by settled exchanges
    #[serde(default)]
    pub quantity: u64,
}

/// An account on the ledger, identified by its public key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// All assets owned by this account
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A fungible category of assets, with the rules governing its exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique name, used as the lookup key
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public keys of the owning accounts; the first entry is the
    /// primary owner
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A declarative exchange constraint attached to a resource or an offer.
///
/// On the wire a rule is a tagged record: `{"type": "EXCHANGE_ONCE"}`, with
/// the allow-list variant carrying its keys under `"value"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    /// Assets of this resource never deplete, for any holder
    AllAssetsInfinite,
    /// Assets of this resource never deplete while held by a resource owner
    OwnerAssetsInfinite,
    /// Assets of this resource may only be offered by resource owners
    NotTransferable,
    /// The offer may be accepted a single time, total
    ExchangeOnce,
    /// The offer may be accepted a single time per account
    ExchangeOncePerAccount,
    /// Only the listed public keys may accept the offer
    ExchangeLimitedToAccounts(BTreeSet<String>),
}

/// Lifecycle state of an offer. Only open offers can be accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    #[default]
    Open,
    Closed,
}

/// A published exchange: `source_quantity` of the source asset's resource
/// for `target_quantity` of the target asset's resource, per unit accepted.
///
/// A `target` of `None` denotes a free offer: acceptors owe nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public keys of the publishing accounts; the first entry holds the
    /// source asset
    #[serde(default)]
    pub owners: Vec<String>,
    /// Asset the offerer gives
    pub source: Uuid,
    /// Units of the source asset given per exchange
    pub source_quantity: u64,
    /// Asset the offerer expects payment into, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Uuid>,
    /// Units of the target resource owed per exchange; 0 for free offers
    #[serde(default)]
    pub target_quantity: u64,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub status: OfferStatus,
}

impl Offer {
    /// True when acceptors owe nothing in return.
    pub fn is_free(&self) -> bool {
        self.target.is_none()
    }
}

// ============================================================================
// REQUEST PAYLOADS
// ============================================================================

/// Body for `POST assets`. The ledger assigns the id and a zero quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resource: String,
}

/// Body for `POST offers`. Free offers omit both target fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: Uuid,
    pub source_quantity: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_quantity: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
}

/// Body for `PATCH offers/{id}/accept`.
///
/// `target` is the acceptor's asset that receives the offered resource;
/// `source` is the acceptor's asset that pays, omitted for free offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferAcceptance {
    /// Number of exchange units, resolved and clamped before submission
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Uuid>,
    pub target: Uuid,
}
