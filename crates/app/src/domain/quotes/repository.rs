//! Quotes Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use crate::database::Db;

use super::models::{DealerInfo, Quote, QuoteUuid};

const INSERT_QUOTE_SQL: &str = include_str!("sql/insert_quote.sql");
const GET_QUOTE_SQL: &str = include_str!("sql/get_quote.sql");
const QUOTE_NUMBER_EXISTS_SQL: &str = include_str!("sql/quote_number_exists.sql");

#[derive(Debug, Clone)]
pub struct PgQuotesRepository {
    db: Db,
}

impl PgQuotesRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

impl<'r> FromRow<'r, PgRow> for Quote {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let lines: serde_json::Value = row.try_get("lines")?;

        Ok(Self {
            uuid: QuoteUuid::from_uuid(row.try_get("uuid")?),
            quote_number: row.try_get("quote_number")?,
            dealer: DealerInfo {
                name: row.try_get("dealer_name")?,
                email: row.try_get("dealer_email")?,
            },
            lines: serde_json::from_value(lines).map_err(|e| sqlx::Error::ColumnDecode {
                index: "lines".to_string(),
                source: Box::new(e),
            })?,
            subtotal: row.try_get("subtotal")?,
            tax: row.try_get("tax")?,
            total: row.try_get("total")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
        })
    }
}

#[async_trait]
impl QuotesRepository for PgQuotesRepository {
    async fn insert_quote(&self, quote: &Quote) -> Result<(), sqlx::Error> {
        let lines = serde_json::to_value(&quote.lines).map_err(|e| sqlx::Error::ColumnDecode {
            index: "lines".to_string(),
            source: Box::new(e),
        })?;

        query(INSERT_QUOTE_SQL)
            .bind(quote.uuid.into_uuid())
            .bind(&quote.quote_number)
            .bind(&quote.dealer.name)
            .bind(&quote.dealer.email)
            .bind(lines)
            .bind(quote.subtotal)
            .bind(quote.tax)
            .bind(quote.total)
            .bind(SqlxTimestamp::from(quote.created_at))
            .bind(SqlxTimestamp::from(quote.expires_at))
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn get_quote(&self, quote_number: &str) -> Result<Option<Quote>, sqlx::Error> {
        query_as::<Postgres, Quote>(GET_QUOTE_SQL)
            .bind(quote_number)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn quote_number_exists(&self, quote_number: &str) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(QUOTE_NUMBER_EXISTS_SQL)
            .bind(quote_number)
            .fetch_one(self.db.pool())
            .await
    }
}

#[automock]
#[async_trait]
pub trait QuotesRepository: Send + Sync {
    /// Persist a freshly cut quote.
    async fn insert_quote(&self, quote: &Quote) -> Result<(), sqlx::Error>;

    /// Fetch a quote directly by its number — no scanning of a dealer's full
    /// quote history.
    async fn get_quote(&self, quote_number: &str) -> Result<Option<Quote>, sqlx::Error>;

    /// Whether a quote number is already taken.
    async fn quote_number_exists(&self, quote_number: &str) -> Result<bool, sqlx::Error>;
}
