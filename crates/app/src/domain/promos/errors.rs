//! Promo ledger errors.

use sprocket::{promos::PromoError, roles::Role};
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromoLedgerError {
    /// Lookup or application failure; non-fatal to checkout, the caller may
    /// retry without a code.
    #[error(transparent)]
    Promo(#[from] PromoError),

    #[error("promo code already exists")]
    AlreadyExists,

    #[error("percentage promos must be whole percent points")]
    InvalidRate,

    #[error("role {0} may not manage promos")]
    Forbidden(Role),

    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for PromoLedgerError {
    fn from(error: sqlx::Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
