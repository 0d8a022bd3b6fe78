//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::Money;
use store::{Cart, DocumentStore, Order, OrderLine, PostgresStore, Product, StoreError, User, UserId};

use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Run the schema once with raw_sql (multiple statements)
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_shop_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;

    // Create a fresh pool for each test to avoid connection issues
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear tables for test isolation
    sqlx::query("TRUNCATE TABLE users, products, carts, orders")
        .execute(&pool)
        .await
        .unwrap();

    PostgresStore::new(pool)
}

#[tokio::test]
async fn insert_and_find_user() {
    let store = get_test_store().await;

    let user = User::new("Ada Lovelace", "ada@example.com", "hash");
    let id = user.id;
    store.insert_user(user).await.unwrap();

    let by_id = store.find_user(id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "ada@example.com");

    let by_email = store
        .find_user_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, id);
}

#[tokio::test]
async fn duplicate_email_maps_to_duplicate_key() {
    let store = get_test_store().await;

    store
        .insert_user(User::new("Ada", "dup@example.com", "hash1"))
        .await
        .unwrap();

    let result = store
        .insert_user(User::new("Other", "dup@example.com", "hash2"))
        .await;
    assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
}

#[tokio::test]
async fn product_roundtrip_and_listing() {
    let store = get_test_store().await;

    store
        .insert_product(Product::new("prod2", "Gadget", Money::from_cents(500), 3))
        .await
        .unwrap();
    store
        .insert_product(Product::new("prod1", "Widget", Money::from_cents(1000), 100))
        .await
        .unwrap();

    let products = store.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product_id.as_str(), "prod1");
    assert_eq!(products[0].price.cents(), 1000);
    assert_eq!(products[0].stock, 100);

    let found = store.find_product(&"prod2".into()).await.unwrap().unwrap();
    assert_eq!(found.name, "Gadget");
}

#[tokio::test]
async fn conditional_decrement_is_the_stock_gate() {
    let store = get_test_store().await;

    store
        .insert_product(Product::new("prod1", "Widget", Money::from_cents(1000), 100))
        .await
        .unwrap();

    // Within bounds: mutates.
    assert!(store.decrement_stock(&"prod1".into(), 2).await.unwrap());
    let product = store.find_product(&"prod1".into()).await.unwrap().unwrap();
    assert_eq!(product.stock, 98);

    // Over bounds: refused, no mutation.
    assert!(!store.decrement_stock(&"prod1".into(), 200).await.unwrap());
    let product = store.find_product(&"prod1".into()).await.unwrap().unwrap();
    assert_eq!(product.stock, 98);

    // Missing product: refused.
    assert!(!store.decrement_stock(&"ghost".into(), 1).await.unwrap());

    // Compensation path.
    store.increment_stock(&"prod1".into(), 2).await.unwrap();
    let product = store.find_product(&"prod1".into()).await.unwrap().unwrap();
    assert_eq!(product.stock, 100);
}

#[tokio::test]
async fn out_of_range_stock_is_a_read_error_not_a_truncation() {
    let store = get_test_store().await;

    // The BIGINT column admits values a u32 cannot hold; plant one
    // directly and the read must refuse rather than wrap.
    sqlx::query("INSERT INTO products (product_id, name, price_cents, stock) VALUES ($1, $2, $3, $4)")
        .bind("hoard")
        .bind("Warehouse lot")
        .bind(1000_i64)
        .bind(i64::from(u32::MAX) + 1)
        .execute(store.pool())
        .await
        .unwrap();

    let result = store.find_product(&"hoard".into()).await;
    assert!(matches!(result, Err(StoreError::Serialization(_))));
}

#[tokio::test]
async fn cart_upsert_get_delete() {
    let store = get_test_store().await;
    let user_id = UserId::new();

    assert!(store.get_cart(user_id).await.unwrap().is_none());

    let mut cart = Cart::empty(user_id);
    cart.add_item("prod1".into(), 2);
    store.upsert_cart(&cart).await.unwrap();

    let loaded = store.get_cart(user_id).await.unwrap().unwrap();
    assert_eq!(loaded, cart);

    // Upsert replaces.
    cart.add_item("prod2".into(), 1);
    store.upsert_cart(&cart).await.unwrap();
    let loaded = store.get_cart(user_id).await.unwrap().unwrap();
    assert_eq!(loaded.items.len(), 2);

    store.delete_cart(user_id).await.unwrap();
    assert!(store.get_cart(user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn order_roundtrip() {
    let store = get_test_store().await;
    let user_id = UserId::new();

    let order = Order::new(
        user_id,
        vec![
            OrderLine::new("prod1", 2, Money::from_cents(1000)),
            OrderLine::new("prod2", 1, Money::from_cents(500)),
        ],
        "1 Main St",
    );
    store.insert_order(&order).await.unwrap();

    let orders = store.orders_for_user(user_id).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order.id);
    assert_eq!(orders[0].total_price.cents(), 2500);
    assert_eq!(orders[0].lines, order.lines);
    assert_eq!(orders[0].shipping_address, "1 Main St");

    assert!(store.orders_for_user(UserId::new()).await.unwrap().is_empty());
}
