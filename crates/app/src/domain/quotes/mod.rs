//! Quotes
//!
//! Dealer quotes: a non-binding, read-only snapshot of wholesale pricing
//! terms with a fixed validity window. Creating one never touches stock or
//! payments; expiry is advisory and checked by the caller, not enforced here.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::QuoteError;
pub use repository::*;
pub use service::QuoteService;
