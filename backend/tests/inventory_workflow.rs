//! End-to-end inventory workflows over the in-memory stores.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use inventory::domain::ports::ProductRepository;
use inventory::domain::{
    AdjustmentRequest, AdjustmentType, CategoryRef, EmptyState, ErrorCode, InventoryService,
    ProductFilter, ProductForm, RecordId, SortOrder,
};
use inventory::outbound::memory::{
    InventorySeed, MemoryCategoryRepository, MemoryInventory, MemoryProductRepository,
    MemoryStockAdjustmentRepository, SimulatedLatency,
};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

type MemoryService = InventoryService<
    MemoryProductRepository,
    MemoryCategoryRepository,
    MemoryStockAdjustmentRepository,
>;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn service_over(stores: &MemoryInventory) -> MemoryService {
    InventoryService::new(
        Arc::clone(&stores.products),
        Arc::clone(&stores.categories),
        Arc::clone(&stores.adjustments),
        Arc::new(FixedClock(now())),
    )
}

#[fixture]
fn seeded() -> MemoryInventory {
    MemoryInventory::seeded(
        InventorySeed::bundled().expect("bundled seed"),
        SimulatedLatency::none(),
    )
}

fn form(name: &str, sku: &str, category: &str, current_stock: i64) -> ProductForm {
    ProductForm {
        name: name.to_owned(),
        sku: sku.to_owned(),
        category: category.to_owned(),
        price: Decimal::new(1250, 2),
        current_stock,
        ..ProductForm::default()
    }
}

#[rstest]
#[tokio::test]
async fn first_product_in_empty_store_gets_identity_one() {
    let stores = MemoryInventory::default();
    let service = service_over(&stores);

    let created = service
        .create_product(&form("Tape Measure", "tls-300", "Tools", 4))
        .await
        .expect("create");

    assert_eq!(created.id, RecordId::new(1));
    assert_eq!(created.sku, "TLS-300");
    assert_eq!(created.category, CategoryRef::by_name("Tools"));
}

#[rstest]
#[tokio::test]
async fn created_product_round_trips_with_next_identity(seeded: MemoryInventory) {
    let service = service_over(&seeded);

    let created = service
        .create_product(&form("Tape Measure", "tls-300", "Tools", 4))
        .await
        .expect("create");
    let fetched = seeded.products.get_by_id(created.id).await.expect("get");

    assert_eq!(created.id, RecordId::new(8));
    assert_eq!(fetched, created);
    assert_eq!(fetched.last_updated, now());
    assert_eq!(
        fetched.category,
        CategoryRef::ByReference {
            id: RecordId::new(4),
            name: "Tools".to_owned(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn editing_a_prefilled_form_updates_the_product(seeded: MemoryInventory) {
    let service = service_over(&seeded);
    let stored = seeded.products.get_by_id(RecordId::new(1)).await.expect("read");

    let mut form = ProductForm::from(&stored);
    form.price = Decimal::new(4999, 2);
    let updated = service
        .update_product(stored.id, &form, Some(stored.revision))
        .await
        .expect("update");

    assert_eq!(updated.price, Decimal::new(4999, 2));
    assert_eq!(updated.name, stored.name);
    assert_eq!(updated.sku, stored.sku);
    assert_eq!(updated.category_name(), stored.category_name());
    assert_eq!(updated.current_stock, stored.current_stock);
    assert_eq!(updated.revision, stored.revision + 1);
}

#[rstest]
#[tokio::test]
async fn oversized_decrease_floors_at_zero(seeded: MemoryInventory) {
    let service = service_over(&seeded);
    let created = service
        .create_product(&form("Sandpaper", "abr-010", "Tools", 10))
        .await
        .expect("create");
    let request =
        AdjustmentRequest::parse(AdjustmentType::Decrease, "15", "Damaged goods").expect("valid");

    let outcome = service
        .adjust_stock(created.id, Some(created.revision), &request)
        .await
        .expect("adjust");

    assert_eq!(outcome.preview.new_stock, 0);
    assert_eq!(outcome.preview.delta, -10);
    assert_eq!(outcome.product.current_stock, 0);
    let history = service
        .adjustment_history(Some(created.id))
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quantity, 10);
    assert_eq!(history[0].kind, AdjustmentType::Decrease);
    assert_eq!(history[0].reason, "Damaged goods");
}

#[rstest]
#[tokio::test]
async fn adjustment_against_stale_read_is_rejected(seeded: MemoryInventory) {
    let service = service_over(&seeded);
    let product_id = RecordId::new(6);
    let before = seeded.products.get_by_id(product_id).await.expect("read");

    service
        .quick_adjust(product_id, AdjustmentType::Decrease)
        .await
        .expect("first writer");
    let request = AdjustmentRequest::parse(AdjustmentType::Decrease, "5", "Sale").expect("valid");
    let error = service
        .adjust_stock(product_id, Some(before.revision), &request)
        .await
        .expect_err("second writer previewed a stale read");

    assert_eq!(error.code(), ErrorCode::Conflict);
    let after = seeded.products.get_by_id(product_id).await.expect("read");
    assert_eq!(after.current_stock, before.current_stock - 1);
    let history = service
        .adjustment_history(Some(product_id))
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reason, "Quick decrease by 1");
}

#[rstest]
#[tokio::test]
async fn invalid_form_reports_every_violation(seeded: MemoryInventory) {
    let service = service_over(&seeded);
    let invalid = ProductForm {
        name: String::new(),
        sku: "A1".to_owned(),
        category: "Tools".to_owned(),
        price: Decimal::ZERO,
        current_stock: -1,
        low_stock_threshold: -1,
    };

    let error = service.create_product(&invalid).await.expect_err("invalid");

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    let field_errors = error
        .details()
        .and_then(|details| details.get("fieldErrors"))
        .and_then(|errors| errors.as_object())
        .expect("field errors");
    assert_eq!(field_errors.len(), 4);
    assert_eq!(
        seeded.products.get_all().await.expect("list").len(),
        7,
        "nothing was written"
    );
}

#[rstest]
#[tokio::test]
async fn alerts_exclude_zero_stock_but_restock_includes_it(seeded: MemoryInventory) {
    let service = service_over(&seeded);

    let snapshot = service.load_inventory().await.expect("load");
    let view = snapshot.view(&ProductFilter::default(), SortOrder::default());
    let alerts: Vec<u32> = view.low_stock.iter().map(|product| product.id.get()).collect();
    let mut restock: Vec<u32> = service
        .restock_candidates()
        .await
        .expect("restock")
        .iter()
        .map(|product| product.id.get())
        .collect();
    restock.sort_unstable();

    assert_eq!(alerts, vec![2, 5, 7]);
    assert_eq!(restock, vec![2, 3, 5, 7]);
    assert_eq!(view.visible.len(), 7);
    assert_eq!(view.empty_state, None);
}

#[rstest]
#[tokio::test]
async fn empty_state_tracks_active_filters(seeded: MemoryInventory) {
    let seeded_snapshot = service_over(&seeded).load_inventory().await.expect("load");
    let empty_snapshot = service_over(&MemoryInventory::default())
        .load_inventory()
        .await
        .expect("load");
    let filter = ProductFilter::search("no such product");

    assert_eq!(
        seeded_snapshot.view(&filter, SortOrder::default()).empty_state,
        Some(EmptyState::NoMatches)
    );
    assert_eq!(
        empty_snapshot.view(&filter, SortOrder::default()).empty_state,
        Some(EmptyState::NoMatches)
    );
    assert_eq!(
        empty_snapshot
            .view(&ProductFilter::default(), SortOrder::default())
            .empty_state,
        Some(EmptyState::NoProducts)
    );
}

#[rstest]
#[tokio::test]
async fn deleted_product_is_gone(seeded: MemoryInventory) {
    let service = service_over(&seeded);

    service
        .delete_product(RecordId::new(3))
        .await
        .expect("delete");
    let error = service
        .delete_product(RecordId::new(3))
        .await
        .expect_err("already deleted");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
