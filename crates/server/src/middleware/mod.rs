//! HTTP middleware: sessions and authentication extractors.

pub mod auth;
pub mod session;

pub use auth::{
    OptionalCustomer, RequireAdmin, RequireCustomer, RequireSuperuser, RequireWorker,
    clear_current_customer, clear_current_staff, set_current_customer, set_current_staff,
};
pub use session::create_session_layer;
