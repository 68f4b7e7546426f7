//! Listing boards
//!
//! Read-only state behind the offer and resource listing pages: offers
//! annotated with their source/target resource names, the session account
//! snapshot with aggregated quantities, and the eligibility of each row's
//! actions. Empty ledgers are a normal state; listing endpoints that 404
//! collapse to empty boards rather than errors.

use std::collections::HashMap;
use std::future::Future;

use anyhow::Result;
use uuid::Uuid;

use crate::engine::eligibility;
use crate::engine::quantities::AccountSnapshot;
use crate::ledger_client::{ApiError, LedgerClient};
use crate::models::{Offer, Resource};
use crate::session::Session;

/// An offer paired with the resource names behind its asset references.
///
/// Offers reference assets by id; the names come from scanning every
/// account's asset list, so an offer whose assets belong to an unknown
/// account keeps `None` here and stays unacceptable.
#[derive(Debug, Clone)]
pub struct AnnotatedOffer {
    pub offer: Offer,
    pub source_resource: Option<String>,
    pub target_resource: Option<String>,
}

impl AnnotatedOffer {
    /// Whether the accept action is enabled for the given session account.
    pub fn can_accept(&self, account: Option<&AccountSnapshot>) -> bool {
        eligibility::can_accept_offer(
            account,
            self.target_resource.as_deref(),
            self.offer.target_quantity,
        )
    }
}

/// State behind the offer listing page.
#[derive(Debug, Clone)]
pub struct OfferBoard {
    pub offers: Vec<AnnotatedOffer>,
    pub account: Option<AccountSnapshot>,
}

impl OfferBoard {
    /// Offers matching the optional source/target resource filters.
    pub fn filtered(&self, source: Option<&str>, target: Option<&str>) -> Vec<&AnnotatedOffer> {
        self.offers
            .iter()
            .filter(|offer| match source {
                Some(name) => offer.source_resource.as_deref() == Some(name),
                None => true,
            })
            .filter(|offer| match target {
                Some(name) => offer.target_resource.as_deref() == Some(name),
                None => true,
            })
            .collect()
    }

    /// Distinct source resource names, for the filter dropdown.
    pub fn source_resources(&self) -> Vec<&str> {
        dedup(self.offers.iter().filter_map(|o| o.source_resource.as_deref()))
    }

    /// Distinct target resource names, for the filter dropdown.
    pub fn target_resources(&self) -> Vec<&str> {
        dedup(self.offers.iter().filter_map(|o| o.target_resource.as_deref()))
    }
}

/// State behind the resource listing page.
#[derive(Debug, Clone)]
pub struct ResourceBoard {
    pub resources: Vec<Resource>,
    pub account: Option<AccountSnapshot>,
}

impl ResourceBoard {
    /// Whether the offer action is enabled for a resource row.
    pub fn can_offer(&self, resource: &Resource) -> bool {
        eligibility::can_offer_resource(self.account.as_ref(), resource)
    }

    /// Whether the request action is enabled.
    pub fn can_request(&self) -> bool {
        eligibility::can_request_resource(self.account.as_ref())
    }
}

/// Load the offer board: every offer annotated with resource names, plus
/// the session account snapshot when logged in.
///
/// Offers and accounts are fetched concurrently and both must resolve
/// before annotation runs.
pub async fn load_offer_board(client: &LedgerClient, session: &Session) -> Result<OfferBoard> {
    let (offers, accounts) = tokio::try_join!(
        or_empty(client.get_offers()),
        or_empty(client.get_accounts()),
    )?;

    // Pair each asset id with its resource name across all accounts
    let asset_resources: HashMap<Uuid, String> = accounts
        .iter()
        .flat_map(|account| &account.assets)
        .map(|asset| (asset.id, asset.resource.clone()))
        .collect();

    let annotated = offers
        .into_iter()
        .map(|offer| AnnotatedOffer {
            source_resource: asset_resources.get(&offer.source).cloned(),
            target_resource: offer
                .target
                .and_then(|target| asset_resources.get(&target).cloned()),
            offer,
        })
        .collect();

    // The session account is picked out of the accounts dump rather than
    // fetched again
    let account = match session.public_key().await {
        Some(key) => accounts
            .into_iter()
            .find(|account| account.public_key == key)
            .map(AccountSnapshot::of),
        None => None,
    };

    Ok(OfferBoard {
        offers: annotated,
        account,
    })
}

/// Load the resource board: every resource plus the session account
/// snapshot when logged in.
pub async fn load_resource_board(
    client: &LedgerClient,
    session: &Session,
) -> Result<ResourceBoard> {
    let (account, resources) = tokio::try_join!(session.account(), or_empty(client.get_resources()))?;

    Ok(ResourceBoard {
        resources,
        account: account.map(AccountSnapshot::of),
    })
}

/// Collapse a benign-absent listing response into an empty list.
async fn or_empty<T>(
    request: impl Future<Output = Result<Vec<T>, ApiError>>,
) -> Result<Vec<T>, ApiError> {
    match request.await {
        Ok(items) => Ok(items),
        Err(err) if err.is_not_found() => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

fn dedup<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}
