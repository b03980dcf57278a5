//! Cart Models

use crate::domain::catalog::models::BikeUuid;

/// One line of a user's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub bike: BikeUuid,
    pub quantity: u32,
}
