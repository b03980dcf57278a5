//! Quote service errors.

use sprocket::{pricing::PricingError, totals::TotalsError};
use thiserror::Error;

use crate::domain::catalog::models::BikeUuid;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote {0:?} not found")]
    NotFound(String),

    #[error("bike {0} not found")]
    BikeNotFound(BikeUuid),

    #[error("quote has no lines")]
    Empty,

    #[error("missing required field {0}")]
    Validation(&'static str),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Totals(#[from] TotalsError),

    #[error("could not allocate a unique quote number")]
    NumberAllocation,

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
