//! Carts
//!
//! Each user owns exactly one cart, keyed by email. Lines are upserted per
//! bike; the cart is destroyed on order commit or explicit clear. Because a
//! cart is only ever touched by its owner, no cross-user locking exists here.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::CartError;
pub use repository::*;
pub use service::CartStore;
