//! Cart errors.

use thiserror::Error;

use crate::domain::catalog::models::BikeUuid;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    #[error("bike {0} not found")]
    BikeNotFound(BikeUuid),

    #[error("requested {requested} of bike {bike}, but only {available} in stock")]
    InsufficientStock {
        bike: BikeUuid,
        requested: u32,
        available: i64,
    },

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
