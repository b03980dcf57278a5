//! Catalog
//!
//! The engine's read side of the bike catalog: lookups by id and the
//! conditional stock decrement used at order commit. Catalog editing (images,
//! descriptions, listings) belongs to the excluded back-office surface.

pub mod models;
mod repository;

pub use repository::*;
