//! Order types. Orders are read-only in the console.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::null_default;
use crate::error::Error;

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    PaymentPending,
    Paid,
    Fulfilled,
    Cancelled,
    RefundPending,
    Refunded,
    Failed,
}

impl OrderStatus {
    /// Every status, in lifecycle order
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Created,
        OrderStatus::PaymentPending,
        OrderStatus::Paid,
        OrderStatus::Fulfilled,
        OrderStatus::Cancelled,
        OrderStatus::RefundPending,
        OrderStatus::Refunded,
        OrderStatus::Failed,
    ];

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::PaymentPending => "payment_pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::RefundPending => "refund_pending",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| Error::validation(format!("unknown order status: {}", s)))
    }
}

/// Round paise to whole rupees, halves rounding up
pub fn paise_to_rupees(paise: i64) -> i64 {
    (paise as f64 / 100.0 + 0.5).floor() as i64
}

/// An order as returned by the admin API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: OrderStatus,
    /// Amount charged, in paise
    #[serde(default, deserialize_with = "null_default")]
    pub amount_paise: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub subtotal_paise: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub tax_paise: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub shipping_paise: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub discount_percent: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    /// Customer id, or the populated customer document
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total quantity across all line items
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Whether the payment gateway reported a payment
    pub fn has_payment(&self) -> bool {
        self.razorpay_payment_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }

    /// Discount applied to the subtotal, in paise
    pub fn discount_paise(&self) -> i64 {
        (self.subtotal_paise as f64 * self.discount_percent / 100.0).round() as i64
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product reference
    #[serde(default)]
    pub product: Option<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub size: String,
    #[serde(default, deserialize_with = "null_default")]
    pub color: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Unit price in rupees
    #[serde(default, deserialize_with = "null_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub quantity: u32,
}

impl OrderItem {
    /// Price times quantity, in rupees
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Delivery address of an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingAddress {
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}
