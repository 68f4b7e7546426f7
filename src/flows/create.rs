//! Create-offer flow
//!
//! Form state for publishing a new offer, optionally creating the target
//! asset alongside it. Validity is recomputed from current state before
//! every render of the submit control, and `submit` refuses invalid
//! state rather than relying on the ledger to reject it.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use uuid::Uuid;

use crate::ledger_client::{ApiError, LedgerClient};
use crate::models::{Asset, NewAsset, NewOffer, Resource, Rule};
use crate::session::Session;

/// Filter an account's assets for one side of the form: restricted to a
/// resource when the flow was opened from a resource row, otherwise all
/// assets ordered by resource then label.
fn candidate_assets(assets: &[Asset], resource: Option<&str>) -> Vec<Asset> {
    match resource {
        Some(name) => assets
            .iter()
            .filter(|asset| asset.resource == name)
            .cloned()
            .collect(),
        None => {
            let mut sorted = assets.to_vec();
            sorted.sort_by(|a, b| {
                (a.resource.as_str(), a.label.as_deref())
                    .cmp(&(b.resource.as_str(), b.label.as_deref()))
            });
            sorted
        }
    }
}

pub struct CreateOfferFlow {
    client: Arc<LedgerClient>,
    session: Arc<Session>,
    /// Resources for the new-asset dropdown; empty when the target side
    /// was fixed by the caller
    resources: Vec<Resource>,
    sources: Vec<Asset>,
    targets: Vec<Asset>,
    source: Option<Uuid>,
    target: Option<Uuid>,
    /// True once the free option is chosen: no payment requested
    free: bool,
    /// True once the new-asset option is chosen for the target side
    has_new_asset: bool,
    settle_delay: Duration,

    pub label: Option<String>,
    pub description: Option<String>,
    pub source_quantity: u64,
    pub target_quantity: u64,
    pub new_asset_label: Option<String>,
    pub new_asset_description: Option<String>,
    pub new_asset_resource: Option<String>,
    pub exchange_once: bool,
    pub exchange_once_per_account: bool,
    /// Comma-separated public keys for the allow-list rule
    pub limited_to_accounts: Option<String>,
}

impl CreateOfferFlow {
    /// Initialize the flow, optionally pinned to a source resource (the
    /// "offer" action on a resource row) or a target resource (the
    /// "request" action).
    ///
    /// Requires a session account; the resource catalog and the account
    /// resolve before any candidate lists are built.
    pub async fn init(
        client: Arc<LedgerClient>,
        session: Arc<Session>,
        source_resource: Option<&str>,
        target_resource: Option<&str>,
        settle_delay: Duration,
    ) -> Result<Self> {
        let (account, resources) = tokio::try_join!(
            session.account(),
            fetch_resources(&client, target_resource.is_none()),
        )?;
        let account = account.context("creating an offer requires a logged-in account")?;

        let sources = candidate_assets(&account.assets, source_resource);
        let targets = candidate_assets(&account.assets, target_resource);

        let source = source_resource.and_then(|_| sources.first().map(|asset| asset.id));
        let target = target_resource.and_then(|_| targets.first().map(|asset| asset.id));

        Ok(Self {
            client,
            session,
            resources,
            sources,
            targets,
            source,
            target,
            free: false,
            has_new_asset: false,
            settle_delay,
            label: None,
            description: None,
            source_quantity: 0,
            target_quantity: 0,
            new_asset_label: None,
            new_asset_description: None,
            new_asset_resource: None,
            exchange_once: false,
            exchange_once_per_account: false,
            limited_to_accounts: None,
        })
    }

    /// Candidate source assets for the offered side.
    pub fn sources(&self) -> &[Asset] {
        &self.sources
    }

    /// Candidate target assets for the requested side.
    pub fn targets(&self) -> &[Asset] {
        &self.targets
    }

    /// Resource catalog for the new-asset dropdown.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn select_source(&mut self, id: Uuid) -> Result<()> {
        if !self.sources.iter().any(|asset| asset.id == id) {
            anyhow::bail!("asset {} is not a source candidate", id);
        }
        self.source = Some(id);
        Ok(())
    }

    /// Choose an existing asset as the target, clearing the free and
    /// new-asset states.
    pub fn select_target(&mut self, id: Uuid) -> Result<()> {
        if !self.targets.iter().any(|asset| asset.id == id) {
            anyhow::bail!("asset {} is not a target candidate", id);
        }
        self.target = Some(id);
        self.free = false;
        self.has_new_asset = false;
        Ok(())
    }

    /// Make the offer free: no target asset, no payment.
    pub fn select_free(&mut self) {
        self.target = None;
        self.free = true;
        self.has_new_asset = false;
    }

    /// Request payment into an asset created on submission.
    pub fn select_new_target(&mut self) {
        self.target = None;
        self.free = false;
        self.has_new_asset = true;
    }

    pub fn is_free(&self) -> bool {
        self.free
    }

    pub fn has_new_asset(&self) -> bool {
        self.has_new_asset
    }

    /// Whether the form is submittable: a source asset and a positive
    /// source quantity, and - unless the offer is free - a positive
    /// target quantity plus either a chosen target asset or a resource
    /// for the new one.
    pub fn is_valid(&self) -> bool {
        if self.source.is_none() || self.source_quantity == 0 {
            return false;
        }
        if self.free {
            return true;
        }
        if self.target_quantity == 0 {
            return false;
        }
        if self.has_new_asset {
            self.new_asset_resource.is_some()
        } else {
            self.target.is_some()
        }
    }

    /// Rules collected from the form's toggles and allow-list field.
    pub fn collected_rules(&self) -> Vec<Rule> {
        let mut rules = Vec::new();
        if self.exchange_once {
            rules.push(Rule::ExchangeOnce);
        }
        if self.exchange_once_per_account {
            rules.push(Rule::ExchangeOncePerAccount);
        }
        if let Some(keys) = &self.limited_to_accounts {
            let keys: BTreeSet<String> = keys
                .split(',')
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
                .collect();
            if !keys.is_empty() {
                rules.push(Rule::ExchangeLimitedToAccounts(keys));
            }
        }
        rules
    }

    /// Submit the offer: create the new target asset when chosen, post
    /// the offer, wait out the settle delay, and invalidate the session
    /// cache.
    pub async fn submit(self) -> Result<()> {
        if !self.is_valid() {
            anyhow::bail!("offer form is not submittable");
        }

        let target = if self.has_new_asset {
            let resource = self
                .new_asset_resource
                .clone()
                .context("new asset requires a resource")?;
            let created = self
                .client
                .create_asset(&NewAsset {
                    label: self.new_asset_label.clone(),
                    description: self.new_asset_description.clone(),
                    resource,
                })
                .await
                .context("failed to create target asset")?;
            Some(created.id)
        } else {
            self.target
        };

        let offer = NewOffer {
            label: self.label.clone(),
            description: self.description.clone(),
            source: self.source.context("offer form is not submittable")?,
            source_quantity: self.source_quantity,
            target,
            target_quantity: (!self.free).then_some(self.target_quantity),
            rules: self.collected_rules(),
        };
        let created = self
            .client
            .create_offer(&offer)
            .await
            .context("ledger rejected the offer")?;
        info!(offer = %created.id, "offer published");

        // Let the offer settle before anyone reloads listings
        tokio::time::sleep(self.settle_delay).await;
        self.session.invalidate().await;
        Ok(())
    }
}

/// The resource catalog is only needed when the target side is open; a
/// ledger with no resources yet is a normal empty state.
async fn fetch_resources(client: &LedgerClient, needed: bool) -> Result<Vec<Resource>, ApiError> {
    if !needed {
        return Ok(Vec::new());
    }
    match client.get_resources().await {
        Ok(resources) => Ok(resources),
        Err(err) if err.is_not_found() => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}
