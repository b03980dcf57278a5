//! Carts Repository

use async_trait::async_trait;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    database::Db,
    domain::{carts::models::CartLine, catalog::models::BikeUuid},
};

const GET_CART_LINES_SQL: &str = include_str!("sql/get_cart_lines.sql");
const UPSERT_CART_LINE_SQL: &str = include_str!("sql/upsert_cart_line.sql");
const REMOVE_CART_LINE_SQL: &str = include_str!("sql/remove_cart_line.sql");
const CLEAR_CART_SQL: &str = include_str!("sql/clear_cart.sql");

#[derive(Debug, Clone)]
pub struct PgCartsRepository {
    db: Db,
}

impl PgCartsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity_i64: i64 = row.try_get("quantity")?;

        let quantity = u32::try_from(quantity_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            bike: BikeUuid::from_uuid(row.try_get("bike_uuid")?),
            quantity,
        })
    }
}

#[async_trait]
impl CartsRepository for PgCartsRepository {
    async fn get_lines(&self, user_email: &str) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(GET_CART_LINES_SQL)
            .bind(user_email)
            .fetch_all(self.db.pool())
            .await
    }

    async fn upsert_line(
        &self,
        user_email: &str,
        bike: BikeUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_CART_LINE_SQL)
            .bind(user_email)
            .bind(bike.into_uuid())
            .bind(i64::from(quantity))
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn remove_line(&self, user_email: &str, bike: BikeUuid) -> Result<bool, sqlx::Error> {
        let rows_affected = query(REMOVE_CART_LINE_SQL)
            .bind(user_email)
            .bind(bike.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn clear(&self, user_email: &str) -> Result<(), sqlx::Error> {
        query(CLEAR_CART_SQL)
            .bind(user_email)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsRepository: Send + Sync {
    /// All lines in a user's cart, oldest first.
    async fn get_lines(&self, user_email: &str) -> Result<Vec<CartLine>, sqlx::Error>;

    /// Insert a line, or replace the quantity if the bike is already carted.
    async fn upsert_line(
        &self,
        user_email: &str,
        bike: BikeUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error>;

    /// Remove one line; returns whether it existed.
    async fn remove_line(&self, user_email: &str, bike: BikeUuid) -> Result<bool, sqlx::Error>;

    /// Drop every line in the cart.
    async fn clear(&self, user_email: &str) -> Result<(), sqlx::Error>;
}
