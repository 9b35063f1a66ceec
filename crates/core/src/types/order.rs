//! Order domain types.
//!
//! Orders are created server-side. The console reads them and only mutates
//! them locally for notes and shipment tracking, which are not persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::id::{OrderId, ShipmentId};
use super::shipment::{Shipment, ShipmentDraft};
use super::status::OrderStatus;

// =============================================================================
// Order
// =============================================================================

/// A customer order as listed for the vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub status: OrderStatus,
    /// Raw backend timestamp; parsed on demand by the list filter.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub shipping: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub refunded: Decimal,
    #[serde(default)]
    pub earning: Decimal,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub notes: Vec<OrderNote>,
    #[serde(default)]
    pub shipments: Vec<Shipment>,
}

impl Order {
    /// Minimal order, mostly useful for fixtures.
    #[must_use]
    pub fn new(id: impl Into<OrderId>, status: OrderStatus, date: &str) -> Self {
        Self {
            id: id.into(),
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: None,
            status,
            date: date.to_string(),
            total: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            shipping: Decimal::ZERO,
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            refunded: Decimal::ZERO,
            earning: Decimal::ZERO,
            items: vec![],
            billing_address: None,
            shipping_address: None,
            notes: vec![],
            shipments: vec![],
        }
    }

    /// Set the customer name and email.
    #[must_use]
    pub fn with_customer(mut self, name: &str, email: &str) -> Self {
        self.customer_name = name.to_string();
        self.customer_email = email.to_string();
        self
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// subtotal + shipping + tax - discount.
    #[must_use]
    pub fn reconciled_total(&self) -> Decimal {
        self.subtotal + self.shipping + self.tax - self.discount
    }

    /// Whether `total` matches [`Order::reconciled_total`]. Display only.
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.total == self.reconciled_total()
    }

    /// Append a note. Notes are local to the console session.
    pub fn add_note(&mut self, text: &str, is_customer_note: bool, at: DateTime<Utc>) {
        self.notes.push(OrderNote {
            text: text.trim().to_string(),
            date: at.to_rfc3339(),
            is_customer_note,
        });
    }

    /// Record a shipment from a sub-form draft and return its local id.
    pub fn add_shipment(&mut self, draft: ShipmentDraft, at: DateTime<Utc>) -> ShipmentId {
        let shipment = draft.into_shipment(at);
        let id = shipment.id.clone();
        self.shipments.push(shipment);
        id
    }

    /// Change the status string of one shipment.
    ///
    /// Returns `false` when no shipment has the given id.
    pub fn update_shipment_status(&mut self, id: &ShipmentId, status: &str) -> bool {
        match self.shipments.iter_mut().find(|s| &s.id == id) {
            Some(shipment) => {
                shipment.status = status.to_string();
                true
            }
            None => false,
        }
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> Option<&OrderId> {
        Some(&self.id)
    }
}

/// A single product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(alias = "name")]
    pub product_name: String,
    pub quantity: u32,
    #[serde(alias = "price")]
    pub unit_price: Decimal,
    #[serde(default)]
    pub tax: Decimal,
}

impl LineItem {
    /// quantity x unit price + tax.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price + self.tax
    }
}

/// Billing or shipping address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Single-line rendering, skipping empty parts.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            Some(self.line1.as_str()),
            self.line2.as_deref(),
            Some(self.city.as_str()),
            self.state.as_deref(),
            Some(self.postal_code.as_str()),
            Some(self.country.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A note attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNote {
    pub text: String,
    pub date: String,
    /// Customer-visible note, as opposed to a private admin note.
    #[serde(default, alias = "isCustomer")]
    pub is_customer_note: bool,
}
