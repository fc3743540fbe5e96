//! RocketShoes cart command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! cart list
//!
//! # Add one unit of product 3
//! cart add 3
//!
//! # Set product 3 to two units
//! cart set 3 2
//!
//! # Remove product 3
//! cart remove 3
//! ```
//!
//! The storefront API and the storage file come from `CART_*` environment
//! variables and can be overridden with `--api-url` and `--storage`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing::info;

use rocketshoes_cart::{
    init_observability,
    models::CartSummary,
    repositories::{FileStore, HttpStorefrontApi},
    services::{CartStore, ConsoleNotifier, Notifier, TracingNotifier},
    Config, Metrics, ProductId,
};

#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about = "RocketShoes shopping cart")]
struct Cli {
    /// Storefront API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// File holding the persisted cart
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Print Prometheus metrics after running the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart contents and totals
    List,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the amount of a product already in the cart
    Set { product_id: ProductId, amount: u32 },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::from_env()?.with_overrides(cli.api_url, cli.storage)?;

    init_observability(
        &config.observability.service_name,
        &config.observability.log_level,
        config.observability.enable_json_logging,
    )?;

    info!(
        api = %config.api.api_base_url,
        storage = %config.storage.storage_path.display(),
        "Starting cart"
    );

    let api = Arc::new(HttpStorefrontApi::new(
        config.api.api_base_url.clone(),
        config.api.request_timeout(),
    )?);
    let storage = Arc::new(FileStore::new(config.storage.storage_path.clone()));
    let metrics = Arc::new(Metrics::new()?);

    // JSON log consumers get notifications as log events instead of console text
    let notifier: Arc<dyn Notifier> = if config.observability.enable_json_logging {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };

    let store = CartStore::open(api.clone(), api, storage, notifier)
        .context("Failed to open cart storage")?
        .with_metrics(metrics.clone());

    let outcome = match cli.command {
        Commands::List => Ok(()),
        Commands::Add { product_id } => store.add_product(product_id).await,
        Commands::Remove { product_id } => store.remove_product(product_id),
        Commands::Set { product_id, amount } => {
            store.update_product_amount(product_id, amount).await
        }
    };

    print_cart(&store.summary());

    if cli.metrics {
        print!("{}", metrics.encode()?);
    }

    // The notifier has already reported the failure
    if outcome.is_err() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_cart(summary: &CartSummary) {
    if summary.lines.is_empty() {
        println!("Cart is empty");
        return;
    }

    for line in &summary.lines {
        println!(
            "{:>6}  {:<40} {:>4} x {:>10} = {:>10}",
            line.product_id,
            line.title,
            line.amount,
            line.unit_price.to_string(),
            line.subtotal.to_string()
        );
    }

    println!(
        "{} products, {} units, total {}",
        summary.distinct_products, summary.total_units, summary.total_price
    );
}
