//! Orders Repository

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use sprocket::status::OrderStatus;

use crate::database::Db;

use super::models::{Order, OrderUuid, TotalsSnapshot};

const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDERS_FOR_USER_SQL: &str = include_str!("sql/list_orders_for_user.sql");
const ORDER_NUMBER_EXISTS_SQL: &str = include_str!("sql/order_number_exists.sql");
const SET_ORDER_STATUS_SQL: &str = include_str!("sql/set_order_status.sql");

#[derive(Debug, Clone)]
pub struct PgOrdersRepository {
    db: Db,
}

impl PgOrdersRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

fn decode_json<T: serde::de::DeserializeOwned>(
    index: &str,
    value: serde_json::Value,
) -> sqlx::Result<T> {
    serde_json::from_value(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_email: row.try_get("user_email")?,
            lines: decode_json("lines", row.try_get("lines")?)?,
            totals: TotalsSnapshot {
                subtotal: row.try_get("subtotal")?,
                discount: row.try_get("discount")?,
                tax: row.try_get("tax")?,
                shipping: row.try_get("shipping")?,
                total: row.try_get("total")?,
            },
            promo_code: row.try_get("promo_code")?,
            shipping_address: decode_json("shipping_address", row.try_get("shipping_address")?)?,
            payment_method: row.try_get("payment_method")?,
            payment_intent_id: row.try_get("payment_intent_id")?,
            status,
            estimated_delivery: row
                .try_get::<SqlxTimestamp, _>("estimated_delivery")?
                .to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

fn encode_json<T: serde::Serialize>(index: &str, value: &T) -> sqlx::Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn insert_order(&self, order: &Order) -> Result<(), sqlx::Error> {
        query(INSERT_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.order_number)
            .bind(&order.user_email)
            .bind(encode_json("lines", &order.lines)?)
            .bind(order.totals.subtotal)
            .bind(order.totals.discount)
            .bind(order.totals.tax)
            .bind(order.totals.shipping)
            .bind(order.totals.total)
            .bind(&order.promo_code)
            .bind(encode_json("shipping_address", &order.shipping_address)?)
            .bind(&order.payment_method)
            .bind(&order.payment_intent_id)
            .bind(order.status.as_str())
            .bind(SqlxTimestamp::from(order.estimated_delivery))
            .bind(SqlxTimestamp::from(order.created_at))
            .bind(SqlxTimestamp::from(order.updated_at))
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn get_order(&self, order_number: &str) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order_number)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn list_for_user(&self, user_email: &str) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_FOR_USER_SQL)
            .bind(user_email)
            .fetch_all(self.db.pool())
            .await
    }

    async fn order_number_exists(&self, order_number: &str) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(ORDER_NUMBER_EXISTS_SQL)
            .bind(order_number)
            .fetch_one(self.db.pool())
            .await
    }

    async fn set_status(
        &self,
        order_number: &str,
        status: OrderStatus,
        updated_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(SET_ORDER_STATUS_SQL)
            .bind(order_number)
            .bind(status.as_str())
            .bind(SqlxTimestamp::from(updated_at))
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Persist a committed order.
    async fn insert_order(&self, order: &Order) -> Result<(), sqlx::Error>;

    /// Fetch an order directly by its order number.
    async fn get_order(&self, order_number: &str) -> Result<Option<Order>, sqlx::Error>;

    /// All of a user's orders, newest first.
    async fn list_for_user(&self, user_email: &str) -> Result<Vec<Order>, sqlx::Error>;

    /// Whether an order number is already taken.
    async fn order_number_exists(&self, order_number: &str) -> Result<bool, sqlx::Error>;

    /// Update the status column; returns whether the order existed.
    async fn set_status(
        &self,
        order_number: &str,
        status: OrderStatus,
        updated_at: Timestamp,
    ) -> Result<bool, sqlx::Error>;
}
