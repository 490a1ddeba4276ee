//! Typed shop records and their document form.
//!
//! The pipeline itself is schemaless and only sees [`Log`] documents; these
//! types pin down the shapes the repeat-buyers report expects and convert
//! into documents losslessly.

use serde::Serialize;
use time::OffsetDateTime;

use crate::value::{Log, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: String,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub date_placed: OffsetDateTime,
    pub status: String,
    pub lines: Vec<OrderLine>,
}

/// A line references a product by id, it does not own it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub price: f64,
}

/// One row of the repeat-buyers report, the only externally visible
/// output shape. Product ids are kept schemaless, catalogs with numeric
/// ids work the same as string ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatBuyerRow {
    pub product_id: Value,
    pub product_name: String,
    pub multiple_buyer_count: u64,
}

impl RepeatBuyerRow {
    pub fn new(
        product_id: impl Into<Value>,
        product_name: impl Into<String>,
        multiple_buyer_count: u64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            multiple_buyer_count,
        }
    }
}

impl User {
    pub fn new(user_id: impl Into<String>, orders: Vec<Order>) -> Self {
        Self {
            user_id: user_id.into(),
            orders,
        }
    }
}

impl Order {
    pub fn new(date_placed: OffsetDateTime, lines: Vec<OrderLine>) -> Self {
        Self {
            date_placed,
            status: "completed".to_string(),
            lines,
        }
    }
}

impl OrderLine {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            quantity: 1,
        }
    }
}

impl Product {
    pub fn new(product_id: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            price: 0.0,
        }
    }
}

impl From<OrderLine> for Value {
    fn from(line: OrderLine) -> Self {
        let mut doc = Log::new();
        doc.insert("product_id".to_string(), line.product_id.into());
        doc.insert("quantity".to_string(), line.quantity.into());
        Value::Object(doc)
    }
}

impl From<Order> for Value {
    fn from(order: Order) -> Self {
        let mut doc = Log::new();
        doc.insert("date_placed".to_string(), order.date_placed.into());
        doc.insert("status".to_string(), order.status.into());
        doc.insert("order_lines".to_string(), order.lines.into());
        Value::Object(doc)
    }
}

impl From<User> for Log {
    fn from(user: User) -> Self {
        let mut doc = Log::new();
        doc.insert("user_id".to_string(), user.user_id.into());
        doc.insert("orders".to_string(), user.orders.into());
        doc
    }
}

impl From<Product> for Log {
    fn from(product: Product) -> Self {
        let mut doc = Log::new();
        doc.insert("product_id".to_string(), product.product_id.into());
        doc.insert("product_name".to_string(), product.product_name.into());
        doc.insert("price".to_string(), product.price.into());
        doc
    }
}
