//! Checkout: gateway session creation and order finalization.
//!
//! The flow has two halves. `create_gateway_session` prices a client draft
//! against the catalog and opens an order on the payment gateway.
//! `verify_and_finalize` is called when the client returns with a payment id
//! and signature: the signature is checked first, the draft is re-priced,
//! and then the order insert, line insert, stock decrements, and offer-usage
//! increment run in a single transaction. Either every write lands or none
//! does; a stock shortfall discovered at decrement time rolls everything
//! back.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use clove_core::{
    CustomerId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, to_minor_units,
};

use crate::db::{
    self, CatalogRepository, NewOrder, NewOrderItem, OfferRepository, RepositoryError,
    SettingsRepository,
};
use crate::models::{Offer, OfferRejection, Order, ShippingAddress};

use super::gateway::{GatewayError, PaymentGateway};

/// Errors from the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Payment signature did not verify.
    #[error("payment signature verification failed")]
    InvalidSignature,

    /// The draft has no items.
    #[error("cart is empty")]
    EmptyCart,

    /// A draft line references a product that does not exist.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A product is inactive or lacks stock for the requested quantity.
    #[error("product unavailable: {0}")]
    Unavailable(String),

    /// The offer code does not exist.
    #[error("unknown offer code: {0}")]
    UnknownOffer(String),

    /// The offer exists but cannot be applied.
    #[error("offer not applicable: {0}")]
    Offer(#[from] OfferRejection),

    /// Cash on delivery is disabled in site settings.
    #[error("cash on delivery is not available")]
    CodDisabled,

    /// Order total cannot be represented in gateway minor units.
    #[error("order total out of range")]
    AmountOutOfRange,

    /// The gateway order's charged amount does not match the draft total.
    #[error("paid amount does not match the order total")]
    AmountMismatch,

    /// Payment gateway failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One line of a client-supplied order draft.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// A client-supplied order draft. Prices are never taken from the client;
/// the draft carries only product ids and quantities.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutDraft {
    pub items: Vec<DraftItem>,
    pub email: String,
    pub phone: String,
    pub shipping_address: ShippingAddress,
    pub offer_code: Option<String>,
}

/// A gateway checkout session handed back to the client.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckoutSession {
    pub gateway_order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

/// A draft priced against the catalog.
struct PricedDraft {
    items: Vec<NewOrderItem>,
    subtotal: Decimal,
    discount: Decimal,
    shipping_fee: Decimal,
    total: Decimal,
    offer_code: Option<String>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    gateway: &'a PaymentGateway,
    currency: &'a str,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, gateway: &'a PaymentGateway, currency: &'a str) -> Self {
        Self {
            pool,
            gateway,
            currency,
        }
    }

    /// Price a draft and create a gateway order for it.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the draft fails validation or the gateway
    /// call fails.
    pub async fn create_gateway_session(
        &self,
        draft: &CheckoutDraft,
    ) -> Result<CheckoutSession, CheckoutError> {
        let priced = self.price_draft(draft).await?;
        let amount = to_minor_units(priced.total).ok_or(CheckoutError::AmountOutOfRange)?;

        let receipt = order_number();
        let gateway_order = self
            .gateway
            .create_order(amount, self.currency, &receipt)
            .await?;

        tracing::info!(
            gateway_order_id = %gateway_order.id,
            amount,
            "gateway checkout session created"
        );

        Ok(CheckoutSession {
            gateway_order_id: gateway_order.id,
            amount: gateway_order.amount,
            currency: gateway_order.currency,
            key_id: self.gateway.key_id().to_string(),
        })
    }

    /// Verify a returned payment signature and persist the order.
    ///
    /// The signature is checked before anything touches the database. The
    /// signature only proves the gateway order was paid, so the gateway
    /// order is then re-fetched and its charged amount compared against the
    /// re-priced draft; a client cannot pay for a cheap draft and finalize
    /// an expensive one. On success the order lands confirmed and paid,
    /// stock is decremented, and the offer redemption counter is
    /// incremented, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidSignature` on mismatch (nothing is
    /// persisted), `CheckoutError::AmountMismatch` if the charged amount
    /// does not cover the draft, `CheckoutError::Unavailable` if stock ran
    /// out between session creation and verification, or other variants
    /// for validation and database failures.
    pub async fn verify_and_finalize(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
        draft: &CheckoutDraft,
        customer_id: Option<CustomerId>,
    ) -> Result<Order, CheckoutError> {
        if !self
            .gateway
            .verify_signature(gateway_order_id, gateway_payment_id, signature)
        {
            tracing::warn!(gateway_order_id, "rejected payment with bad signature");
            return Err(CheckoutError::InvalidSignature);
        }

        let priced = self.price_draft(draft).await?;
        let expected = to_minor_units(priced.total).ok_or(CheckoutError::AmountOutOfRange)?;

        let gateway_order = self.gateway.fetch_order(gateway_order_id).await?;
        if let Err(err) = check_charged_amount(expected, self.currency, &gateway_order) {
            tracing::warn!(
                gateway_order_id,
                expected,
                charged = gateway_order.amount,
                charged_currency = %gateway_order.currency,
                "rejected payment: charged amount does not match draft"
            );
            return Err(err);
        }

        self.persist_order(
            priced,
            draft,
            customer_id,
            PaymentMethod::Online,
            PaymentStatus::Paid,
            OrderStatus::Confirmed,
            Some(gateway_order_id.to_string()),
            Some(gateway_payment_id.to_string()),
        )
        .await
    }

    /// Place a cash-on-delivery order. No gateway involvement; the order
    /// lands pending/pending.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::CodDisabled` if COD is switched off in site
    /// settings, or other variants for validation and database failures.
    pub async fn place_cod_order(
        &self,
        draft: &CheckoutDraft,
        customer_id: Option<CustomerId>,
    ) -> Result<Order, CheckoutError> {
        let settings = SettingsRepository::new(self.pool).get().await?;
        if !settings.cod_enabled {
            return Err(CheckoutError::CodDisabled);
        }

        let priced = self.price_draft(draft).await?;

        self.persist_order(
            priced,
            draft,
            customer_id,
            PaymentMethod::Cod,
            PaymentStatus::Pending,
            OrderStatus::Pending,
            None,
            None,
        )
        .await
    }

    /// Validate and price a draft against the catalog, offer table, and
    /// site settings.
    async fn price_draft(&self, draft: &CheckoutDraft) -> Result<PricedDraft, CheckoutError> {
        if draft.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let catalog = CatalogRepository::new(self.pool);
        let ids: Vec<ProductId> = draft.items.iter().map(|i| i.product_id).collect();
        let products = catalog.get_products_by_ids(&ids).await?;

        let mut items = Vec::with_capacity(draft.items.len());
        let mut subtotal = Decimal::ZERO;
        for line in &draft.items {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or(CheckoutError::UnknownProduct(line.product_id))?;
            if !product.can_fulfill(line.quantity) {
                return Err(CheckoutError::Unavailable(product.title.clone()));
            }
            subtotal += product.price * Decimal::from(line.quantity);
            items.push(NewOrderItem {
                product_id: product.id,
                sku: product.sku.clone(),
                title: product.title.clone(),
                unit_price: product.price,
                quantity: line.quantity,
            });
        }

        let (discount, offer_code) = match &draft.offer_code {
            Some(code) => {
                let offer = self.load_offer(code).await?;
                offer.check_redeemable(subtotal, chrono::Utc::now())?;
                (offer.discount_for(subtotal), Some(offer.code))
            }
            None => (Decimal::ZERO, None),
        };

        let settings = SettingsRepository::new(self.pool).get().await?;
        let shipping_fee = settings.shipping_fee_for(subtotal);
        let total = subtotal - discount + shipping_fee;

        Ok(PricedDraft {
            items,
            subtotal,
            discount,
            shipping_fee,
            total,
            offer_code,
        })
    }

    async fn load_offer(&self, code: &str) -> Result<Offer, CheckoutError> {
        OfferRepository::new(self.pool)
            .get_by_code(code)
            .await?
            .ok_or_else(|| CheckoutError::UnknownOffer(code.to_string()))
    }

    /// Run the finalization transaction.
    #[allow(clippy::too_many_arguments)]
    async fn persist_order(
        &self,
        priced: PricedDraft,
        draft: &CheckoutDraft,
        customer_id: Option<CustomerId>,
        payment_method: PaymentMethod,
        payment_status: PaymentStatus,
        status: OrderStatus,
        gateway_order_id: Option<String>,
        gateway_payment_id: Option<String>,
    ) -> Result<Order, CheckoutError> {
        let new_order = NewOrder {
            order_number: order_number(),
            customer_id,
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            shipping: draft.shipping_address.clone(),
            subtotal: priced.subtotal,
            discount: priced.discount,
            shipping_fee: priced.shipping_fee,
            total: priced.total,
            offer_code: priced.offer_code.clone(),
            payment_method,
            payment_status,
            status,
            gateway_order_id,
            gateway_payment_id,
        };

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let order = db::insert_order(&mut *tx, &new_order).await?;
        db::insert_items(&mut *tx, order.id, &priced.items).await?;

        for item in &priced.items {
            if !db::decrement_stock(&mut *tx, item.product_id, item.quantity).await? {
                // Dropping the transaction rolls back the order insert.
                return Err(CheckoutError::Unavailable(item.title.clone()));
            }
        }

        if let Some(code) = &priced.offer_code
            && !db::increment_usage(&mut *tx, code).await?
        {
            // A concurrent checkout took the last redemption.
            return Err(CheckoutError::Offer(OfferRejection::Exhausted));
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            order_number = %order.order_number,
            total = %order.total,
            method = ?payment_method,
            "order finalized"
        );

        Ok(order)
    }
}

/// Check that a gateway order's charged amount and currency match what the
/// draft prices to.
fn check_charged_amount(
    expected_minor: i64,
    expected_currency: &str,
    gateway_order: &super::gateway::GatewayOrder,
) -> Result<(), CheckoutError> {
    if gateway_order.amount != expected_minor || gateway_order.currency != expected_currency {
        return Err(CheckoutError::AmountMismatch);
    }
    Ok(())
}

/// Generate a public order number (also used as the gateway receipt).
fn order_number() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("CLV-{}", &id[..12].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_shape() {
        let n = order_number();
        assert!(n.starts_with("CLV-"));
        assert_eq!(n.len(), 16);
        assert!(n[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_order_numbers_unique() {
        assert_ne!(order_number(), order_number());
    }

    fn gateway_order(amount: i64, currency: &str) -> super::super::gateway::GatewayOrder {
        super::super::gateway::GatewayOrder {
            id: "order_test".to_string(),
            amount,
            currency: currency.to_string(),
        }
    }

    #[test]
    fn test_matching_charge_accepted() {
        assert!(check_charged_amount(10_000, "INR", &gateway_order(10_000, "INR")).is_ok());
    }

    #[test]
    fn test_undercharged_order_rejected() {
        // A payment for a cheaper gateway order must not finalize a
        // more expensive draft.
        assert!(matches!(
            check_charged_amount(10_000, "INR", &gateway_order(100, "INR")),
            Err(CheckoutError::AmountMismatch)
        ));
    }

    #[test]
    fn test_overcharged_order_rejected() {
        assert!(matches!(
            check_charged_amount(100, "INR", &gateway_order(10_000, "INR")),
            Err(CheckoutError::AmountMismatch)
        ));
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        assert!(matches!(
            check_charged_amount(10_000, "INR", &gateway_order(10_000, "USD")),
            Err(CheckoutError::AmountMismatch)
        ));
    }
}
