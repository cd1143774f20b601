//! Storefront command-line entry point.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fulfillment_content::ContentFactory;
use fulfillment_core::{CatalogOracle, DeliveryMode, EntityId, ItemHandle, Order, QualityTier};
use storefront::{Storefront, StorefrontConfig};

/// Buy goods for a colony and see where they land.
#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Catalog purchases with in-world delivery", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory (overrides STOREFRONT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every item for sale as JSON
    Catalog,

    /// Quote a price without touching the world
    Quote(OrderArgs),

    /// Buy an item and print the receipt as JSON
    Buy {
        #[command(flatten)]
        order: OrderArgs,

        /// Write the updated world back to the data directory
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args)]
struct OrderArgs {
    /// Item name or numeric handle
    item: String,

    #[arg(short, long, default_value_t = 1)]
    quantity: u32,

    /// Quality tier (awful .. legendary)
    #[arg(long)]
    quality: Option<String>,

    /// Material name or numeric handle
    #[arg(long)]
    material: Option<String>,

    /// Agent the order is addressed to
    #[arg(long)]
    requester: Option<u32>,

    /// deliver, equip, wear or carry
    #[arg(long, default_value = "deliver")]
    mode: String,
}

impl OrderArgs {
    fn to_order(&self, catalog: &impl CatalogOracle) -> Result<Order> {
        let mut order = Order::new(resolve_item(catalog, &self.item)?, self.quantity);
        if let Some(quality) = &self.quality {
            let tier: QualityTier = quality
                .parse()
                .map_err(|_| anyhow::anyhow!("Unknown quality tier '{}'", quality))?;
            order = order.with_quality(tier);
        }
        if let Some(material) = &self.material {
            order = order.with_material(resolve_item(catalog, material)?);
        }
        if let Some(requester) = self.requester {
            order = order.for_requester(EntityId(requester));
        }
        let mode: DeliveryMode = self
            .mode
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown delivery mode '{}'", self.mode))?;
        Ok(order.with_mode(mode))
    }
}

fn resolve_item(catalog: &impl CatalogOracle, name: &str) -> Result<ItemHandle> {
    if let Ok(handle) = name.parse::<u32>() {
        return Ok(ItemHandle(handle));
    }
    catalog
        .find_by_name(name)
        .with_context(|| format!("No item named '{}'", name))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = StorefrontConfig::from_env();
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }

    let factory = ContentFactory::new(&settings.data_dir);
    let storefront = Storefront::new(factory.load_catalog()?, factory.load_config()?)
        .with_settings(&settings);

    match cli.command {
        Command::Catalog => {
            println!("{}", serde_json::to_string_pretty(&storefront.listings())?);
        }
        Command::Quote(args) => {
            let order = args.to_order(storefront.catalog())?;
            let quote = storefront.quote(&order)?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Command::Buy { order, save } => {
            let order = order.to_order(storefront.catalog())?;
            let mut world = factory.load_world()?;
            let receipt = storefront.purchase(&mut world, &order)?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            if save {
                factory.save_world(&world)?;
                tracing::info!(dir = %factory.data_dir().display(), "world saved");
            }
        }
    }

    Ok(())
}
