//! Record types persisted by the document store.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// Created at registration and immutable afterwards. The password is
/// stored only as an Argon2 hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    /// Unique across all users.
    pub email: String,
    pub password_hash: String,
}

impl User {
    /// Creates a new user with a fresh ID.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            full_name: full_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// A catalog product.
///
/// Stock is only ever mutated through the store's conditional
/// decrement (and the compensating increment), so it cannot go
/// negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub stock: u32,
}

impl Product {
    /// Creates a new product.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        stock: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            stock,
        }
    }
}

/// A single line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A user's staging list of product/quantity pairs prior to purchase.
///
/// Created lazily on the first add and deleted entirely on successful
/// checkout. Each product appears in at most one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: UserId,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
        }
    }

    /// Returns true if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a quantity of a product, merging into an existing line
    /// when the product is already in the cart.
    pub fn add_item(&mut self, product_id: ProductId, quantity: u32) {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem {
                product_id,
                quantity,
            }),
        }
    }

    /// Removes the line for a product if present.
    ///
    /// Returns true if a line was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() != before
    }
}

/// A line in a placed order.
///
/// The price is a snapshot taken at order time and is decoupled from
/// later catalog price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Money,
}

impl OrderLine {
    /// Creates a new order line.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price,
        }
    }

    /// Returns the total for this line (price * quantity).
    pub fn line_total(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// Payment state of an order. Checkout only ever sets `Pending`;
/// advancing it belongs to a payment collaborator outside this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Paid" => Ok(PaymentStatus::Paid),
            "Failed" => Ok(PaymentStatus::Failed),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// Fulfillment state of an order, a linear progression. Checkout only
/// ever sets `Pending`; later transitions belong to a fulfillment
/// collaborator outside this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Processing" => Ok(OrderStatus::Processing),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// An immutable record of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    /// Invariant: equals the sum of `price * quantity` over all lines.
    pub total_price: Money,
    pub shipping_address: String,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending order, computing the total from the lines.
    pub fn new(user_id: UserId, lines: Vec<OrderLine>, shipping_address: impl Into<String>) -> Self {
        let total_price = lines.iter().map(OrderLine::line_total).sum();
        Self {
            id: OrderId::new(),
            user_id,
            lines,
            total_price,
            shipping_address: shipping_address.into(),
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
