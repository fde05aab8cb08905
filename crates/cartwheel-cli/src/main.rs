//! Command-line driver for the cart store: one subcommand per cart
//! operation, with an interactive prompt for the store-conflict flow.

use std::io::Write;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use cartwheel_core::{load_config, AppConfig, LineOption, Product};
use cartwheel_remote::CartClient;
use cartwheel_store::{
    AddOutcome, CartStore, JsonFileStorage, MutationOutcome, Notice, Notifier,
};

#[derive(Debug, Parser)]
#[command(name = "cartwheel")]
#[command(about = "Marketplace cart synchronization engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the cart grouped by store, with totals.
    Show,
    /// Add a product to the cart.
    Add {
        product_id: i64,
        #[arg(long, default_value = "1")]
        store_id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "0")]
        price: Decimal,
        /// Variant option ID; requires --value-id.
        #[arg(long, requires = "value_id")]
        option_id: Option<i64>,
        #[arg(long, requires = "option_id")]
        value_id: Option<i64>,
    },
    /// Remove a line from the cart.
    Remove {
        product_id: i64,
        #[arg(long, default_value = "1")]
        store_id: String,
        #[arg(long, requires = "value_id")]
        option_id: Option<i64>,
        #[arg(long, requires = "option_id")]
        value_id: Option<i64>,
    },
    /// Set the quantity of a line (0 removes it).
    Update {
        product_id: i64,
        quantity: i64,
        #[arg(long, default_value = "1")]
        store_id: String,
        #[arg(long, requires = "value_id")]
        option_id: Option<i64>,
        #[arg(long, requires = "option_id")]
        value_id: Option<i64>,
    },
    /// Empty the cart.
    Clear,
}

/// Prints the store's advisory notices as terminal toasts.
struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::ItemAdded { product_id } => println!("added product {product_id}"),
            Notice::ItemRemoved { product_id } => println!("removed product {product_id}"),
            Notice::QuantityUpdated {
                product_id,
                quantity,
            } => println!("product {product_id} set to {quantity}"),
            Notice::CartCleared {
                server_acknowledged,
            } => {
                if server_acknowledged {
                    println!("cart cleared");
                } else {
                    println!("cart cleared locally (server did not confirm)");
                }
            }
            Notice::Rejected { message } => println!("rejected: {message}"),
            Notice::ConflictDetected { message } => println!("conflict: {message}"),
            Notice::NetworkFailure { message } => println!("network error: {message}"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config().context("loading configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let mut store = build_store(&config).context("building cart store")?;
    store.hydrate().await;

    match cli.command {
        Commands::Show => show(&store),
        Commands::Add {
            product_id,
            store_id,
            quantity,
            name,
            price,
            option_id,
            value_id,
        } => {
            let product = Product {
                id: product_id,
                name,
                price,
                image: "/no-image.png".to_owned(),
                has_discount: false,
                special_price: None,
                original_price: None,
            };
            let option = line_option(option_id, value_id);
            let outcome = store.add_line(product, &store_id, quantity, option).await;
            let outcome = match outcome {
                AddOutcome::NeedsDecision(conflict) => {
                    let replace = confirm_replace(&conflict.message)?;
                    store.resolve_conflict(conflict, replace).await
                }
                other => other,
            };
            report_add(&outcome);
            show(&store);
        }
        Commands::Remove {
            product_id,
            store_id,
            option_id,
            value_id,
        } => {
            let option = line_option(option_id, value_id);
            let outcome = store.remove_line(product_id, &store_id, option.as_ref()).await;
            report_mutation(&outcome);
            show(&store);
        }
        Commands::Update {
            product_id,
            quantity,
            store_id,
            option_id,
            value_id,
        } => {
            let option = line_option(option_id, value_id);
            let outcome = store
                .update_quantity(product_id, &store_id, quantity, option.as_ref())
                .await;
            report_mutation(&outcome);
            show(&store);
        }
        Commands::Clear => {
            store.clear_cart().await;
        }
    }

    Ok(())
}

fn build_store(config: &AppConfig) -> anyhow::Result<CartStore<CartClient, JsonFileStorage>> {
    let client = CartClient::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let storage = JsonFileStorage::new(&config.storage_path);
    Ok(CartStore::with_notifier(
        client,
        storage,
        Box::new(StdoutNotifier),
    ))
}

fn line_option(option_id: Option<i64>, value_id: Option<i64>) -> Option<LineOption> {
    match (option_id, value_id) {
        (Some(option_id), Some(value_id)) => Some(LineOption {
            option_id,
            value_id,
        }),
        _ => None,
    }
}

fn confirm_replace(message: &str) -> anyhow::Result<bool> {
    println!("{message}");
    print!("Clear the existing cart and add this item instead? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn report_add(outcome: &AddOutcome) {
    match outcome {
        AddOutcome::Completed => {}
        AddOutcome::Failed { message } => eprintln!("add failed: {message}"),
        AddOutcome::Cancelled => println!("kept the existing cart"),
        AddOutcome::NeedsDecision(_) => unreachable!("decision resolved above"),
    }
}

fn report_mutation(outcome: &MutationOutcome) {
    if let MutationOutcome::Failed { message } = outcome {
        eprintln!("failed: {message}");
    }
}

fn show<B: cartwheel_store::CartBackend, S: cartwheel_store::SnapshotStorage>(
    store: &CartStore<B, S>,
) {
    if store.lines().is_empty() {
        println!("cart is empty");
        return;
    }
    for (store_id, lines) in store.lines_by_store() {
        println!("store {store_id} ({} items)", store.store_item_count(store_id));
        for line in lines {
            println!(
                "  {} x{} @ {} = {}",
                line.product.name,
                line.quantity,
                line.product.effective_price(),
                line.line_total()
            );
        }
    }
    println!("total: {} ({} items)", store.total(), store.item_count());
}
