use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    pub qty: u32,
}

impl CartItem {
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.qty))
    }
}

/// Payload of an add-to-cart action. `qty` defaults to 1.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewCartItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub price: u64,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub meta: Option<String>,
    #[serde(default)]
    pub qty: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub subtotal: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Billing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Any other contact fields the checkout form sends, kept as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Placed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub totals: Totals,
    pub billing: Billing,
    pub status: OrderStatus,
}
