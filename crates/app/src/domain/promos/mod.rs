//! Promos
//!
//! Lookup and application of promo codes at checkout, plus the admin-gated
//! create/deactivate operations. The checkout flow never mutates a promo.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::PromoLedgerError;
pub use repository::*;
pub use service::{PromoApplication, PromoLedger};
