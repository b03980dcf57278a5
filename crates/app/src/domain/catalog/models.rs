//! Catalog Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Bike UUID
pub type BikeUuid = TypedUuid<Bike>;

/// Bike Model
///
/// Price is in minor currency units. `stock` is live inventory; orders
/// snapshot name and price at commit time rather than referencing this row.
#[derive(Debug, Clone, PartialEq)]
pub struct Bike {
    pub uuid: BikeUuid,
    pub name: String,
    pub price: i64,
    pub stock: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
