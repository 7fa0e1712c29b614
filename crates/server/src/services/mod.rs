//! Business-logic services sitting between the routes and the db layer.
//!
//! - [`auth`] - credential registration/login for customers and staff
//! - [`cache`] - content cache with explicit invalidation hooks
//! - [`checkout`] - payment-gateway session creation and order finalization
//! - [`gateway`] - payment gateway REST client and signature verification

pub mod auth;
pub mod cache;
pub mod checkout;
pub mod gateway;

pub use auth::{AuthError, AuthService};
pub use cache::ContentCache;
pub use checkout::{CheckoutError, CheckoutService};
pub use gateway::{GatewayError, PaymentGateway, verify_payment_signature};
