use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::Money;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Cart, CartItem, Order, OrderId, OrderLine, Product, ProductId, Result, StoreError, User,
    UserId, store::DocumentStore,
};

/// PostgreSQL-backed document store implementation.
///
/// Embedded sequences (cart items, order lines) are stored as JSONB
/// columns; everything else maps to plain columns. Single-statement
/// updates give the per-document atomicity the trait requires.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database and runs migrations.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        let store = Self::new(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_user(row: &PgRow) -> Result<User> {
        Ok(User {
            id: UserId::from_uuid(row.try_get::<Uuid, _>("id")?),
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        })
    }

    fn row_to_product(row: &PgRow) -> Result<Product> {
        let stock: i64 = row.try_get("stock")?;
        Ok(Product {
            product_id: ProductId::new(row.try_get::<String, _>("product_id")?),
            name: row.try_get("name")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            stock: u32::try_from(stock)
                .map_err(|e| StoreError::Serialization(serde::de::Error::custom(e)))?,
        })
    }

    fn row_to_order(row: &PgRow) -> Result<Order> {
        let lines_json: serde_json::Value = row.try_get("lines")?;
        let lines: Vec<OrderLine> = serde_json::from_value(lines_json)?;
        let payment_status: String = row.try_get("payment_status")?;
        let order_status: String = row.try_get("order_status")?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            lines,
            total_price: Money::from_cents(row.try_get("total_cents")?),
            shipping_address: row.try_get("shipping_address")?,
            payment_status: payment_status
                .parse()
                .map_err(|e: String| StoreError::Serialization(serde::de::Error::custom(e)))?,
            order_status: order_status
                .parse()
                .map_err(|e: String| StoreError::Serialization(serde::de::Error::custom(e)))?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn insert_user(&self, user: User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, full_name, email, password_hash) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("users_email_unique")
            {
                return StoreError::DuplicateKey {
                    collection: "users",
                    key: user.email.clone(),
                };
            }
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, full_name, email, password_hash FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row =
            sqlx::query("SELECT id, full_name, email, password_hash FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn insert_product(&self, product: Product) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (product_id, name, price_cents, stock) VALUES ($1, $2, $3, $4)",
        )
        .bind(product.product_id.as_str())
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(i64::from(product.stock))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("products_pkey")
            {
                return StoreError::DuplicateKey {
                    collection: "products",
                    key: product.product_id.to_string(),
                };
            }
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT product_id, name, price_cents, stock FROM products ORDER BY product_id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_product).collect()
    }

    async fn find_product(&self, product_id: &ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(
            "SELECT product_id, name, price_cents, stock FROM products WHERE product_id = $1",
        )
        .bind(product_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_product).transpose()
    }

    async fn decrement_stock(&self, product_id: &ProductId, quantity: u32) -> Result<bool> {
        // Single conditional UPDATE: the stock check and the decrement
        // happen in one atomic statement.
        let result = sqlx::query(
            "UPDATE products SET stock = stock - $2 WHERE product_id = $1 AND stock >= $2",
        )
        .bind(product_id.as_str())
        .bind(i64::from(quantity))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn increment_stock(&self, product_id: &ProductId, quantity: u32) -> Result<()> {
        sqlx::query("UPDATE products SET stock = stock + $2 WHERE product_id = $1")
            .bind(product_id.as_str())
            .bind(i64::from(quantity))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_cart(&self, user_id: UserId) -> Result<Option<Cart>> {
        let row = sqlx::query("SELECT user_id, items FROM carts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let items_json: serde_json::Value = row.try_get("items")?;
                let items: Vec<CartItem> = serde_json::from_value(items_json)?;
                Ok(Some(Cart { user_id, items }))
            }
            None => Ok(None),
        }
    }

    async fn upsert_cart(&self, cart: &Cart) -> Result<()> {
        let items_json = serde_json::to_value(&cart.items)?;

        sqlx::query(
            r#"
            INSERT INTO carts (user_id, items) VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET items = EXCLUDED.items
            "#,
        )
        .bind(cart.user_id.as_uuid())
        .bind(items_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_cart(&self, user_id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_order(&self, order: &Order) -> Result<()> {
        let lines_json = serde_json::to_value(&order.lines)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, lines, total_cents, shipping_address,
                                payment_status, order_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(lines_json)
        .bind(order.total_price.cents())
        .bind(&order.shipping_address)
        .bind(order.payment_status.to_string())
        .bind(order.order_status.to_string())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, lines, total_cents, shipping_address,
                   payment_status, order_status, created_at
            FROM orders WHERE user_id = $1 ORDER BY created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_order).collect()
    }
}
