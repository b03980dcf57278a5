//! Orders
//!
//! The immutable order ledger: committed orders snapshot their line items and
//! totals, and only the status (plus its timestamp) may change afterwards.
//! There is no deletion; cancellation is a status.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::OrderError;
pub use repository::*;
pub use service::OrderLedger;
