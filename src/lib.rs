//! Marketplace client library
//!
//! The decision core behind a peer-to-peer barter marketplace front end:
//! a pure exchange-rule engine (quantity aggregation, rule evaluation,
//! count resolution, eligibility gating), an HTTP client for the remote
//! ledger, a session account cache, and the accept/create/listing flows
//! that tie them together.

pub mod config;
pub mod engine;
pub mod flows;
pub mod ledger_client;
pub mod models;
pub mod session;

// Re-export public types for convenience
pub use config::{ApiConfig, MarketplaceConfig, SessionConfig};
pub use engine::eligibility::{can_accept_offer, can_offer_resource, can_request_resource};
pub use engine::quantities::{resource_quantities, AccountSnapshot};
pub use engine::resolver::{resolve_exchange, ExchangeTerms, ResolvedExchange};
pub use flows::accept::{AcceptFlow, AssetOption};
pub use flows::create::CreateOfferFlow;
pub use flows::listing::{
    load_offer_board, load_resource_board, AnnotatedOffer, OfferBoard, ResourceBoard,
};
pub use ledger_client::{ApiError, LedgerClient};
pub use models::{
    Account, Asset, NewAsset, NewOffer, Offer, OfferAcceptance, OfferStatus, Resource, Rule,
};
pub use session::Session;
