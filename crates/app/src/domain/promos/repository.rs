//! Promos Repository

use async_trait::async_trait;
use mockall::automock;
use rusty_money::iso;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use sprocket::promos::{Promo, PromoKind};

use crate::database::Db;

const GET_PROMO_SQL: &str = include_str!("sql/get_promo.sql");
const CREATE_PROMO_SQL: &str = include_str!("sql/create_promo.sql");
const SET_PROMO_ACTIVE_SQL: &str = include_str!("sql/set_promo_active.sql");

#[derive(Debug, Clone)]
pub struct PgPromosRepository {
    db: Db,
}

impl PgPromosRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

/// Stored projection of a promo row; reassembled into the domain type on read.
#[derive(Debug)]
struct PromoRow {
    code: String,
    kind: String,
    discount: i64,
    description: String,
    active: bool,
}

impl<'r> FromRow<'r, PgRow> for PromoRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            code: row.try_get("code")?,
            kind: row.try_get("kind")?,
            discount: row.try_get("discount")?,
            description: row.try_get("description")?,
            active: row.try_get("active")?,
        })
    }
}

impl PromoRow {
    fn into_promo(self) -> sqlx::Result<Promo> {
        let kind = PromoKind::from_parts(&self.kind, self.discount, iso::USD).ok_or_else(|| {
            sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: format!("unknown promo kind {:?}", self.kind).into(),
            }
        })?;

        Ok(Promo::new(&self.code, kind, &self.description, self.active))
    }
}

#[async_trait]
impl PromosRepository for PgPromosRepository {
    async fn get_promo(&self, code: &str) -> Result<Option<Promo>, sqlx::Error> {
        let row = query_as::<Postgres, PromoRow>(GET_PROMO_SQL)
            .bind(code.to_lowercase())
            .fetch_optional(self.db.pool())
            .await?;

        row.map(PromoRow::into_promo).transpose()
    }

    async fn create_promo(&self, promo: &Promo) -> Result<(), sqlx::Error> {
        let magnitude =
            promo
                .kind()
                .magnitude()
                .ok_or_else(|| sqlx::Error::ColumnDecode {
                    index: "discount".to_string(),
                    source: "promo magnitude is not storable".into(),
                })?;

        query(CREATE_PROMO_SQL)
            .bind(promo.code())
            .bind(promo.kind().kind_label())
            .bind(magnitude)
            .bind(promo.description())
            .bind(promo.is_active())
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn set_active(&self, code: &str, active: bool) -> Result<bool, sqlx::Error> {
        let rows_affected = query(SET_PROMO_ACTIVE_SQL)
            .bind(code.to_lowercase())
            .bind(active)
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

#[automock]
#[async_trait]
pub trait PromosRepository: Send + Sync {
    /// Case-insensitive lookup by code.
    async fn get_promo(&self, code: &str) -> Result<Option<Promo>, sqlx::Error>;

    /// Store a new promo.
    async fn create_promo(&self, promo: &Promo) -> Result<(), sqlx::Error>;

    /// Flip a promo's active flag; returns whether the code existed.
    async fn set_active(&self, code: &str, active: bool) -> Result<bool, sqlx::Error>;
}
