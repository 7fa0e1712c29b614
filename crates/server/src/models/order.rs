//! Order and order-line models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clove_core::{
    CustomerId, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, RefundStatus,
};

/// A persisted order.
///
/// Created only by the checkout flow (never by hand); status columns mutate
/// through the transition rules in `clove_core::OrderStatus`, and rows are
/// never hard-deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_id: Option<CustomerId>,
    pub email: String,
    pub phone: String,
    #[sqlx(flatten)]
    #[serde(rename = "shipping_address")]
    pub shipping: ShippingAddress,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    pub offer_code: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub refund_status: Option<RefundStatus>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shipping address stored inline on the order row (`ship_*` columns).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShippingAddress {
    #[sqlx(rename = "ship_name")]
    pub name: String,
    #[sqlx(rename = "ship_line1")]
    pub line1: String,
    #[sqlx(rename = "ship_line2")]
    pub line2: Option<String>,
    #[sqlx(rename = "ship_city")]
    pub city: String,
    #[sqlx(rename = "ship_state")]
    pub state: String,
    #[sqlx(rename = "ship_postal_code")]
    pub postal_code: String,
    #[sqlx(rename = "ship_country")]
    pub country: String,
}

/// A line item on an order. Price and title are denormalized at purchase
/// time so later catalog edits don't rewrite history.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub sku: String,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl Order {
    /// Whether a refund may be recorded against this order.
    ///
    /// Refunds apply only to online-paid orders that have been cancelled;
    /// COD orders never enter the refund workflow.
    #[must_use]
    pub fn refund_allowed(&self) -> bool {
        self.payment_method == PaymentMethod::Online && self.status == OrderStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(method: PaymentMethod, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(1),
            order_number: "CLV-1".into(),
            customer_id: None,
            email: "c@example.com".into(),
            phone: "555".into(),
            shipping: ShippingAddress {
                name: "C".into(),
                line1: "1 Main St".into(),
                line2: None,
                city: "Pune".into(),
                state: "MH".into(),
                postal_code: "411001".into(),
                country: "IN".into(),
            },
            subtotal: Decimal::new(1000, 2),
            discount: Decimal::ZERO,
            shipping_fee: Decimal::ZERO,
            total: Decimal::new(1000, 2),
            offer_code: None,
            payment_method: method,
            payment_status: PaymentStatus::Paid,
            status,
            refund_status: None,
            gateway_order_id: None,
            gateway_payment_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_refund_requires_online_and_cancelled() {
        assert!(order(PaymentMethod::Online, OrderStatus::Cancelled).refund_allowed());
        assert!(!order(PaymentMethod::Cod, OrderStatus::Cancelled).refund_allowed());
        assert!(!order(PaymentMethod::Online, OrderStatus::Delivered).refund_allowed());
        assert!(!order(PaymentMethod::Online, OrderStatus::Confirmed).refund_allowed());
    }
}
