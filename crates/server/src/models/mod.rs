//! Database-backed domain models.
//!
//! Every model derives `sqlx::FromRow` with field names matching the columns
//! in `migrations/0001_initial.sql`, so repositories can use runtime
//! `query_as` binding.

pub mod catalog;
pub mod customer;
pub mod offer;
pub mod order;
pub mod review;
pub mod settings;
pub mod staff;

pub use catalog::{CarouselSlide, Category, Product};
pub use customer::{Address, Customer, CurrentCustomer};
pub use offer::{Offer, OfferRejection};
pub use order::{Order, OrderItem, ShippingAddress};
pub use review::Review;
pub use settings::SiteSettings;
pub use staff::{CurrentStaff, Staff, StaffTask, session_keys};
