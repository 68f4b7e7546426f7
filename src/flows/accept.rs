//! Accept-offer flow
//!
//! Guides a session account through accepting an offer: loads the offer,
//! both participants' accounts, and the offered resource's rules before
//! any quantity computation runs; re-resolves the exchange count on every
//! quantity edit; and submits the resolved acceptance, never the raw
//! input. The offerer's capacity caps what can be received, the
//! acceptor's capacity caps what can be paid.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use uuid::Uuid;

use crate::engine::resolver::{resolve_exchange, ExchangeTerms, ResolvedExchange};
use crate::engine::rules;
use crate::ledger_client::LedgerClient;
use crate::models::{NewAsset, Offer, OfferAcceptance, OfferStatus};
use crate::session::Session;

/// A selectable asset in the accept form's dropdowns. The receive side
/// ends with a new-asset option, which has no id.
#[derive(Debug, Clone)]
pub struct AssetOption {
    pub asset_id: Option<Uuid>,
    pub resource: String,
    pub label: Option<String>,
    pub quantity: u64,
}

impl AssetOption {
    /// True for the option that creates a fresh asset on submission.
    pub fn is_new(&self) -> bool {
        self.asset_id.is_none()
    }
}

pub struct AcceptFlow {
    client: Arc<LedgerClient>,
    session: Arc<Session>,
    offer: Offer,
    /// Resource the acceptor receives (behind the offer's source asset)
    offered_resource: String,
    /// Resource the acceptor pays with, absent for free offers
    requested_resource: Option<String>,
    receive_options: Vec<AssetOption>,
    selected_receive: usize,
    pay_options: Vec<AssetOption>,
    selected_pay: Option<usize>,
    /// Offerer's legally available source quantity
    in_max: u64,
    /// Acceptor's available quantity in the selected pay asset
    out_max: u64,
    account_allowed: bool,
    resolved: ResolvedExchange,
    settle_delay: Duration,
    /// Label and description for the new asset, when that option is chosen
    pub new_asset_label: Option<String>,
    pub new_asset_description: Option<String>,
}

impl AcceptFlow {
    /// Initialize the flow for one offer.
    ///
    /// Fetches the offer, then joins the session account and the offer
    /// owner's account, then the offered resource's rules. Only once all
    /// three have resolved is the initial exchange seeded, with an input
    /// of one unit (the minimum viable trade). Errors abort the flow
    /// before any shared state is touched.
    pub async fn init(
        client: Arc<LedgerClient>,
        session: Arc<Session>,
        offer_id: Uuid,
        settle_delay: Duration,
    ) -> Result<Self> {
        let offer = client.get_offer(offer_id).await?;
        if offer.status != OfferStatus::Open {
            anyhow::bail!("offer {} is not open", offer.id);
        }
        let owner_key = offer
            .owners
            .first()
            .context("offer has no owners")?
            .clone();

        let (account, owner) =
            tokio::try_join!(session.account(), client.get_account(&owner_key))?;
        let account = account.context("accepting an offer requires a logged-in account")?;

        let source_asset = owner
            .assets
            .iter()
            .find(|asset| asset.id == offer.source)
            .with_context(|| format!("offer source asset {} not held by owner", offer.source))?;
        let offered_resource = source_asset.resource.clone();

        // Receive dropdown: the acceptor's assets of the offered resource,
        // closed by the new-asset option
        let mut receive_options: Vec<AssetOption> = account
            .assets
            .iter()
            .filter(|asset| asset.resource == offered_resource)
            .map(|asset| AssetOption {
                asset_id: Some(asset.id),
                resource: asset.resource.clone(),
                label: asset.label.clone(),
                quantity: asset.quantity,
            })
            .collect();
        receive_options.push(AssetOption {
            asset_id: None,
            resource: offered_resource.clone(),
            label: None,
            quantity: 0,
        });

        // Pay dropdown: only when the offer requests payment
        let (requested_resource, pay_options) = match offer.target {
            Some(target) => {
                let resource = owner
                    .assets
                    .iter()
                    .find(|asset| asset.id == target)
                    .with_context(|| {
                        format!("offer target asset {} not held by owner", target)
                    })?
                    .resource
                    .clone();
                let options: Vec<AssetOption> = account
                    .assets
                    .iter()
                    .filter(|asset| asset.resource == resource)
                    .map(|asset| AssetOption {
                        asset_id: Some(asset.id),
                        resource: asset.resource.clone(),
                        label: asset.label.clone(),
                        quantity: asset.quantity,
                    })
                    .collect();
                (Some(resource), options)
            }
            None => (None, Vec::new()),
        };
        let selected_pay = if pay_options.is_empty() { None } else { Some(0) };
        let out_max = pay_options.first().map(|option| option.quantity).unwrap_or(0);

        let resource = client.get_resource(&offered_resource).await?;
        let in_max = rules::available_quantity(
            source_asset.quantity,
            &resource.rules,
            &owner.public_key,
            &resource.owners,
        );
        let account_allowed = rules::is_account_allowed(&offer.rules, &account.public_key);

        let mut flow = Self {
            client,
            session,
            offer,
            offered_resource,
            requested_resource,
            receive_options,
            selected_receive: 0,
            pay_options,
            selected_pay,
            in_max,
            out_max,
            account_allowed,
            resolved: ResolvedExchange::default(),
            settle_delay,
            new_asset_label: None,
            new_asset_description: None,
        };
        flow.set_input_quantity(1);
        Ok(flow)
    }

    /// Re-resolve the exchange for an edited input quantity. Called on
    /// every edit; the resolved values are what rendering shows and what
    /// submission uses.
    pub fn set_input_quantity(&mut self, input_quantity: u64) {
        self.resolved = resolve_exchange(
            input_quantity,
            ExchangeTerms::from(&self.offer),
            &self.offer.rules,
            self.in_max,
            self.out_max,
        );
    }

    /// Select the asset that receives the offered resource.
    pub fn select_receive_asset(&mut self, index: usize) -> Result<()> {
        if index >= self.receive_options.len() {
            anyhow::bail!("no receive option at index {}", index);
        }
        self.selected_receive = index;
        Ok(())
    }

    /// Select the asset that pays the requested resource, updating the
    /// capacity cap and re-resolving.
    pub fn select_pay_asset(&mut self, index: usize) -> Result<()> {
        let option = self
            .pay_options
            .get(index)
            .with_context(|| format!("no pay option at index {}", index))?;
        self.out_max = option.quantity;
        self.selected_pay = Some(index);
        self.set_input_quantity(self.resolved.input_quantity);
        Ok(())
    }

    pub fn offer(&self) -> &Offer {
        &self.offer
    }

    /// Resource the acceptor receives.
    pub fn offered_resource(&self) -> &str {
        &self.offered_resource
    }

    /// Resource the acceptor pays with, absent for free offers.
    pub fn requested_resource(&self) -> Option<&str> {
        self.requested_resource.as_deref()
    }

    pub fn receive_options(&self) -> &[AssetOption] {
        &self.receive_options
    }

    pub fn pay_options(&self) -> &[AssetOption] {
        &self.pay_options
    }

    pub fn resolved(&self) -> ResolvedExchange {
        self.resolved
    }

    /// Whether the offer's allow-list admits the session account. The
    /// ledger enforces this at settlement; checking here avoids
    /// submitting an acceptance that is certain to be rejected.
    pub fn account_allowed(&self) -> bool {
        self.account_allowed
    }

    /// The accept form is submittable once a nonzero exchange resolved
    /// and the account is admitted by the offer's rules.
    pub fn is_valid(&self) -> bool {
        self.resolved.count != 0 && self.account_allowed
    }

    /// Submit the acceptance: create the new receive asset when chosen,
    /// patch the acceptance with the resolved count, wait out the settle
    /// delay, and invalidate the session cache so quantities refetch.
    pub async fn submit(self) -> Result<()> {
        if !self.is_valid() {
            anyhow::bail!("acceptance is not submittable");
        }

        let selected = &self.receive_options[self.selected_receive];
        let target = match selected.asset_id {
            Some(id) => id,
            None => {
                let created = self
                    .client
                    .create_asset(&NewAsset {
                        label: self.new_asset_label.clone(),
                        description: self.new_asset_description.clone(),
                        resource: self.offered_resource.clone(),
                    })
                    .await
                    .context("failed to create asset for acceptance")?;
                created.id
            }
        };

        let source = self
            .selected_pay
            .and_then(|index| self.pay_options[index].asset_id);

        let acceptance = OfferAcceptance {
            count: self.resolved.count,
            source,
            target,
        };
        self.client
            .accept_offer(self.offer.id, &acceptance)
            .await
            .context("ledger rejected the acceptance")?;
        info!(offer = %self.offer.id, count = acceptance.count, "acceptance submitted");

        // Let the exchange settle before anyone reloads quantities
        tokio::time::sleep(self.settle_delay).await;
        self.session.invalidate().await;
        Ok(())
    }
}
