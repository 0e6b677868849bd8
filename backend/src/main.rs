//! Inventory entry-point: loads settings, seeds the in-memory stores, and
//! logs the derived inventory view.

use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use inventory::domain::{InventoryService, ProductFilter, SortOrder};
use inventory::seed_data::{InventorySettings, build_memory_inventory};

/// Application bootstrap.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = InventorySettings::load_from_iter(std::env::args_os())
        .wrap_err("load inventory settings")?;
    let stores = build_memory_inventory(&settings).wrap_err("prepare in-memory stores")?;
    let service = InventoryService::new(
        stores.products,
        stores.categories,
        stores.adjustments,
        Arc::new(DefaultClock),
    );

    let snapshot = service
        .load_inventory()
        .await
        .wrap_err("load inventory")?;
    let view = snapshot.view(&ProductFilter::default(), SortOrder::default());
    info!(
        products = snapshot.products.len(),
        categories = snapshot.categories.len(),
        visible = view.visible.len(),
        "inventory loaded"
    );
    for product in &view.low_stock {
        info!(
            product_id = %product.id,
            sku = %product.sku,
            current_stock = product.current_stock,
            low_stock_threshold = product.low_stock_threshold,
            "low stock"
        );
    }

    let restock = service
        .restock_candidates()
        .await
        .wrap_err("query restock candidates")?;
    let history = service
        .adjustment_history(None)
        .await
        .wrap_err("load adjustment history")?;
    info!(
        restock_candidates = restock.len(),
        adjustments = history.len(),
        default_low_stock_threshold = settings.blank_product_form().low_stock_threshold,
        "inventory summary"
    );
    Ok(())
}
