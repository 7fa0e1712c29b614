//! Order repository.
//!
//! Reads go through [`OrderRepository`] on the pool. The writes that make up
//! order finalization and cancellation take an explicit connection so the
//! checkout service can run them inside one transaction: order insert, line
//! insert, stock decrement, and offer-usage increment commit or roll back
//! together.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use clove_core::{CustomerId, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, RefundStatus};

use super::RepositoryError;
use crate::models::{Order, OrderItem, ShippingAddress};

const ORDER_COLUMNS: &str = "id, order_number, customer_id, email, phone, \
     ship_name, ship_line1, ship_line2, ship_city, ship_state, ship_postal_code, ship_country, \
     subtotal, discount, shipping_fee, total, offer_code, \
     payment_method, payment_status, status, refund_status, \
     gateway_order_id, gateway_payment_id, created_at, updated_at";

const ITEM_COLUMNS: &str = "order_id, product_id, sku, title, unit_price, quantity";

/// Fields for inserting an order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: Option<CustomerId>,
    pub email: String,
    pub phone: String,
    pub shipping: ShippingAddress,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    pub offer_code: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
}

/// A line to insert alongside an order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub sku: String,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Filters for the back-office order list.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub limit: i64,
    pub offset: i64,
}

/// Insert an order row. Transactional; pass the checkout transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the order number or gateway order
/// id already exists (double verification of the same payment).
pub async fn insert_order(conn: &mut PgConnection, new: &NewOrder) -> Result<Order, RepositoryError> {
    let sql = format!(
        "INSERT INTO orders
             (order_number, customer_id, email, phone,
              ship_name, ship_line1, ship_line2, ship_city, ship_state,
              ship_postal_code, ship_country,
              subtotal, discount, shipping_fee, total, offer_code,
              payment_method, payment_status, status,
              gateway_order_id, gateway_payment_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                 $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
         RETURNING {ORDER_COLUMNS}"
    );
    sqlx::query_as::<_, Order>(&sql)
        .bind(&new.order_number)
        .bind(new.customer_id)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.shipping.name)
        .bind(&new.shipping.line1)
        .bind(&new.shipping.line2)
        .bind(&new.shipping.city)
        .bind(&new.shipping.state)
        .bind(&new.shipping.postal_code)
        .bind(&new.shipping.country)
        .bind(new.subtotal)
        .bind(new.discount)
        .bind(new.shipping_fee)
        .bind(new.total)
        .bind(&new.offer_code)
        .bind(new.payment_method)
        .bind(new.payment_status)
        .bind(new.status)
        .bind(&new.gateway_order_id)
        .bind(&new.gateway_payment_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "order already recorded for this payment"))
}

/// Insert the order's line items.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if an insert fails.
pub async fn insert_items(
    conn: &mut PgConnection,
    order_id: OrderId,
    items: &[NewOrderItem],
) -> Result<(), RepositoryError> {
    for item in items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, sku, title, unit_price, quantity)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(&item.sku)
        .bind(&item.title)
        .bind(item.unit_price)
        .bind(item.quantity)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Decrement stock for one product, guarded against going negative.
///
/// Returns `false` when the product has fewer than `quantity` units left,
/// in which case the caller must roll the transaction back.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn decrement_stock(
    conn: &mut PgConnection,
    product_id: ProductId,
    quantity: i32,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        "UPDATE products
         SET stock_qty = stock_qty - $2, updated_at = now()
         WHERE id = $1 AND stock_qty >= $2",
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Return an order's items to stock (cancellation).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn restock_items(conn: &mut PgConnection, order_id: OrderId) -> Result<(), RepositoryError> {
    sqlx::query(
        "UPDATE products p
         SET stock_qty = p.stock_qty + oi.quantity, updated_at = now()
         FROM order_items oi
         WHERE oi.order_id = $1 AND oi.product_id = p.id",
    )
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Repository for reading and mutating persisted orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by its public order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_number(&self, number: &str) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(number)
            .fetch_optional(self.pool)
            .await?;
        Ok(order)
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(order)
    }

    /// List a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE customer_id = $1
             ORDER BY created_at DESC"
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer_id)
            .fetch_all(self.pool)
            .await?;
        Ok(orders)
    }

    /// Back-office order list with optional status filters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE ($1::order_status IS NULL OR status = $1)
               AND ($2::payment_status IS NULL OR payment_status = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(filter.status)
            .bind(filter.payment_status)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(self.pool)
            .await?;
        Ok(orders)
    }

    /// Fetch the line items for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(order_id)
            .fetch_all(self.pool)
            .await?;
        Ok(items)
    }

    /// Set an order's status. Transition legality is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, RepositoryError> {
        let sql = format!(
            "UPDATE orders SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Record a refund-workflow update.
    ///
    /// `Completed` also flips the payment status to refunded; the two-step
    /// rule (only cancelled online orders) is enforced by the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn set_refund_status(
        &self,
        id: OrderId,
        refund_status: RefundStatus,
    ) -> Result<Order, RepositoryError> {
        let flip_paid = refund_status == RefundStatus::Completed;
        let sql = format!(
            "UPDATE orders
             SET refund_status = $2,
                 payment_status = CASE WHEN $3 THEN 'refunded'::payment_status
                                       ELSE payment_status END,
                 updated_at = now()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(refund_status)
            .bind(flip_paid)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Cancel an order atomically: flip the status, restock its items, and
    /// start the refund workflow when an online payment was captured.
    ///
    /// The caller checks `OrderStatus::can_cancel` first; the `WHERE` clause
    /// re-checks under the transaction so two racing cancellations cannot
    /// both restock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order is missing or no
    /// longer cancellable.
    pub async fn cancel(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE orders
             SET status = 'cancelled',
                 refund_status = CASE
                     WHEN payment_method = 'online' AND payment_status = 'paid'
                     THEN 'started'::refund_status
                     ELSE refund_status END,
                 updated_at = now()
             WHERE id = $1
               AND status IN ('pending', 'confirmed', 'processing', 'packing')
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        restock_items(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(order)
    }
}
