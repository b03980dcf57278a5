//! Checkout
//!
//! The checkout pipeline: cart → pricing → promo → payment authorization →
//! order commit. This is the only module that sequences the others, and the
//! boundary where every request payload is validated before any side effect.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CheckoutError;
pub use models::{CheckoutIntent, PricedLine};
pub use service::CheckoutService;
