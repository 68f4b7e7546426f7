//! Marketplace CLI
//!
//! Terminal front end for the marketplace ledger: lists offers and
//! resources with per-row eligibility, accepts offers, and publishes new
//! ones. All decisions come from the engine and flows; this binary only
//! renders them.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin marketplace -- --config marketplace.toml offers
//! ```
//!
//! Or set the config path via environment variable:
//!
//! ```bash
//! MARKETPLACE_CONFIG_PATH=marketplace.toml cargo run --bin marketplace -- resources
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use marketplace_client::{
    flows::accept::AcceptFlow,
    flows::create::CreateOfferFlow,
    flows::listing::{load_offer_board, load_resource_board},
    LedgerClient, MarketplaceConfig, Session,
};

#[derive(Parser, Debug)]
#[command(name = "marketplace")]
#[command(about = "Marketplace client - browse, offer, and accept exchanges on the ledger")]
struct Args {
    /// Path to configuration file (default: config/marketplace.toml or
    /// MARKETPLACE_CONFIG_PATH env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Session public key, overriding the configured one
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List open offers with accept eligibility
    Offers {
        /// Only offers of this resource
        #[arg(long)]
        source: Option<String>,
        /// Only offers requesting this resource
        #[arg(long)]
        target: Option<String>,
    },
    /// List resources with offer/request eligibility
    Resources,
    /// Accept an offer
    Accept {
        offer_id: Uuid,
        /// Quantity of the offered resource to ask for
        #[arg(long, default_value_t = 1)]
        quantity: u64,
    },
    /// Publish an offer of a resource
    Create {
        /// Resource to offer
        #[arg(long)]
        source_resource: String,
        /// Units given per exchange
        #[arg(long)]
        source_quantity: u64,
        /// Resource requested in return; omit together with
        /// target-quantity for a free offer
        #[arg(long)]
        target_resource: Option<String>,
        /// Units requested per exchange
        #[arg(long)]
        target_quantity: Option<u64>,
        #[arg(long)]
        label: Option<String>,
        /// Limit the offer to a single acceptance
        #[arg(long)]
        exchange_once: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let config = match &args.config {
        Some(path) => MarketplaceConfig::load_from_path(path)?,
        None => MarketplaceConfig::load()?,
    };
    info!("Ledger URL: {}", config.api.base_url);

    let client = Arc::new(LedgerClient::new(&config.api)?);
    let key = args.key.or_else(|| config.session.public_key.clone());
    let session = Arc::new(Session::new(client.clone(), key)?);

    match args.command {
        Command::Offers { source, target } => {
            let board = load_offer_board(&client, &session).await?;
            let offers = board.filtered(source.as_deref(), target.as_deref());
            if offers.is_empty() {
                println!("there are currently no available offers");
                return Ok(());
            }
            for entry in offers {
                let offer = &entry.offer;
                let requested = match entry.target_resource.as_deref() {
                    Some(name) => format!("{} x{}", name, offer.target_quantity),
                    None => "free".to_string(),
                };
                let acceptable = if entry.can_accept(board.account.as_ref()) {
                    "accept: yes"
                } else {
                    "accept: no"
                };
                println!(
                    "{}  {}  {} x{} -> {}  [{}]",
                    offer.id,
                    offer.label.as_deref().unwrap_or("-"),
                    entry.source_resource.as_deref().unwrap_or("?"),
                    offer.source_quantity,
                    requested,
                    acceptable,
                );
            }
        }
        Command::Resources => {
            let board = load_resource_board(&client, &session).await?;
            if board.resources.is_empty() {
                println!("there are currently no available resources");
                return Ok(());
            }
            for resource in &board.resources {
                println!(
                    "{}  offer: {}  request: {}  {}",
                    resource.name,
                    if board.can_offer(resource) { "yes" } else { "no" },
                    if board.can_request() { "yes" } else { "no" },
                    resource.description.as_deref().unwrap_or(""),
                );
            }
        }
        Command::Accept { offer_id, quantity } => {
            let mut flow = AcceptFlow::init(
                client.clone(),
                session.clone(),
                offer_id,
                config.settle_delay(),
            )
            .await?;
            flow.set_input_quantity(quantity);
            let resolved = flow.resolved();
            if !flow.is_valid() {
                anyhow::bail!(
                    "cannot accept offer {}: no valid exchange for quantity {}",
                    offer_id,
                    quantity
                );
            }
            println!(
                "accepting {} unit(s): receive {} {}, pay {}",
                resolved.count,
                resolved.input_quantity,
                flow.offered_resource(),
                match flow.requested_resource() {
                    Some(name) => format!("{} {}", resolved.output_quantity, name),
                    None => "nothing".to_string(),
                },
            );
            flow.submit().await?;
            println!("acceptance settled");
        }
        Command::Create {
            source_resource,
            source_quantity,
            target_resource,
            target_quantity,
            label,
            exchange_once,
        } => {
            let mut flow = CreateOfferFlow::init(
                client.clone(),
                session.clone(),
                Some(&source_resource),
                target_resource.as_deref(),
                config.settle_delay(),
            )
            .await?;
            flow.label = label;
            flow.source_quantity = source_quantity;
            flow.exchange_once = exchange_once;
            match target_quantity {
                Some(quantity) => flow.target_quantity = quantity,
                None => flow.select_free(),
            }
            if !flow.is_valid() {
                anyhow::bail!("offer form is incomplete; check quantities and target");
            }
            flow.submit().await?;
            println!("offer published");
        }
    }

    Ok(())
}
