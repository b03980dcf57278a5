//! Catalog Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{database::Db, domain::catalog::models::Bike};

use super::models::BikeUuid;

const GET_BIKE_SQL: &str = include_str!("sql/get_bike.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    db: Db,
}

impl PgCatalogRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

impl<'r> FromRow<'r, PgRow> for Bike {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: BikeUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn get_bike(&self, bike: BikeUuid) -> Result<Option<Bike>, sqlx::Error> {
        query_as::<Postgres, Bike>(GET_BIKE_SQL)
            .bind(bike.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }

    async fn decrement_stock(&self, bike: BikeUuid, quantity: i64) -> Result<bool, sqlx::Error> {
        // Conditional decrement: zero rows affected means the remaining stock
        // could not cover the requested quantity.
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(bike.into_uuid())
            .bind(quantity)
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

#[automock]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Retrieve a bike by id.
    async fn get_bike(&self, bike: BikeUuid) -> Result<Option<Bike>, sqlx::Error>;

    /// Atomically decrement stock if at least `quantity` remains; returns
    /// whether the decrement happened.
    async fn decrement_stock(&self, bike: BikeUuid, quantity: i64) -> Result<bool, sqlx::Error>;
}
