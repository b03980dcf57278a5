//! Order ledger errors.

use sprocket::{roles::Role, status::StatusError};
use thiserror::Error;

use crate::domain::catalog::models::BikeUuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order {0:?} not found")]
    NotFound(String),

    #[error("role {0} may not access this order")]
    Forbidden(Role),

    #[error("order has no lines")]
    Empty,

    #[error("insufficient stock for bike {bike}: requested {requested}")]
    InsufficientStock { bike: BikeUuid, requested: u32 },

    /// Rejected status change; the order is left untouched.
    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("could not allocate a unique order number")]
    NumberAllocation,

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
