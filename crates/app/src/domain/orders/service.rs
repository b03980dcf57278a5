//! Order ledger.

use std::sync::Arc;

use jiff::Timestamp;
use sprocket::status::OrderStatus;
use tracing::info;

use crate::domain::{
    actor::Actor,
    catalog::CatalogRepository,
    orders::{
        errors::OrderError,
        models::{DELIVERY_ESTIMATE, NewOrder, Order, OrderUuid},
        repository::OrdersRepository,
    },
    reference::generate_reference,
};

/// Attempts at drawing an unused order number before giving up.
const NUMBER_ATTEMPTS: usize = 5;

/// Prefix on generated order numbers.
const ORDER_NUMBER_PREFIX: &str = "MC";

/// Commits orders and drives their status lifecycle.
#[derive(Clone)]
pub struct OrderLedger {
    orders: Arc<dyn OrdersRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl OrderLedger {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { orders, catalog }
    }

    /// Commit a finalized order.
    ///
    /// Decrements stock per line (conditionally: a line whose quantity
    /// exceeds remaining stock fails instead of overselling), allocates a
    /// collision-checked order number, and inserts the record with status
    /// [`OrderStatus::Confirmed`] and an estimated delivery a fixed window
    /// from now. Writes are independent statements by design — see the
    /// checkout service for how a failure after payment confirmation is
    /// treated.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Empty`]: no lines.
    /// - [`OrderError::InsufficientStock`]: a line could not be covered.
    /// - [`OrderError::NumberAllocation`]: no unused number after bounded
    ///   retries.
    /// - [`OrderError::Sql`]: storage failure.
    pub async fn commit(&self, new_order: NewOrder) -> Result<Order, OrderError> {
        if new_order.lines.is_empty() {
            return Err(OrderError::Empty);
        }

        for line in &new_order.lines {
            let decremented = self
                .catalog
                .decrement_stock(line.bike, i64::from(line.quantity))
                .await?;

            if !decremented {
                return Err(OrderError::InsufficientStock {
                    bike: line.bike,
                    requested: line.quantity,
                });
            }
        }

        let now = Timestamp::now();
        let order_number = self.allocate_order_number(now).await?;

        let order = Order {
            uuid: OrderUuid::new(),
            order_number,
            user_email: new_order.user_email,
            lines: new_order.lines,
            totals: new_order.totals,
            promo_code: new_order.promo_code,
            shipping_address: new_order.shipping_address,
            payment_method: new_order.payment_method,
            payment_intent_id: new_order.payment_intent_id,
            status: OrderStatus::Confirmed,
            estimated_delivery: now + DELIVERY_ESTIMATE,
            created_at: now,
            updated_at: now,
        };

        self.orders.insert_order(&order).await?;

        info!(
            order_number = %order.order_number,
            total = order.totals.total,
            "order committed"
        );

        Ok(order)
    }

    /// Fetch an order, scoped to its owner unless the actor is elevated.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotFound`]: unknown order number.
    /// - [`OrderError::Forbidden`]: the actor may not read this order.
    /// - [`OrderError::Sql`]: storage failure.
    pub async fn get(&self, actor: &Actor, order_number: &str) -> Result<Order, OrderError> {
        let order = self
            .orders
            .get_order(order_number)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_number.to_string()))?;

        if actor.role.is_elevated() || actor.owns_email(&order.user_email) {
            Ok(order)
        } else {
            Err(OrderError::Forbidden(actor.role))
        }
    }

    /// List a user's orders; reading another user's history requires an
    /// elevated role.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Forbidden`]: the actor may not read this history.
    /// - [`OrderError::Sql`]: storage failure.
    pub async fn list_for_user(
        &self,
        actor: &Actor,
        user_email: &str,
    ) -> Result<Vec<Order>, OrderError> {
        if !actor.role.is_elevated() && !actor.owns_email(user_email) {
            return Err(OrderError::Forbidden(actor.role));
        }

        Ok(self.orders.list_for_user(&user_email.to_lowercase()).await?)
    }

    /// Request a status transition.
    ///
    /// Elevated roles may drive any edge the lifecycle graph permits; the
    /// order's owner may only cancel, and only while the graph still allows
    /// it. A rejected transition leaves the order untouched.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotFound`]: unknown order number.
    /// - [`OrderError::Forbidden`]: the actor may not make this change.
    /// - [`OrderError::Status`]: the transition is not in the graph.
    /// - [`OrderError::Sql`]: storage failure.
    pub async fn update_status(
        &self,
        actor: &Actor,
        order_number: &str,
        next: OrderStatus,
    ) -> Result<Order, OrderError> {
        let mut order = self
            .orders
            .get_order(order_number)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_number.to_string()))?;

        let owner_cancelling = actor.owns_email(&order.user_email) && next == OrderStatus::Cancelled;

        if !actor.role.is_elevated() && !owner_cancelling {
            return Err(OrderError::Forbidden(actor.role));
        }

        let status = order.status.transition_to(next)?;
        let updated_at = Timestamp::now();

        if !self
            .orders
            .set_status(order_number, status, updated_at)
            .await?
        {
            return Err(OrderError::NotFound(order_number.to_string()));
        }

        info!(order_number, status = status.as_str(), "order status updated");

        order.status = status;
        order.updated_at = updated_at;

        Ok(order)
    }

    async fn allocate_order_number(&self, now: Timestamp) -> Result<String, OrderError> {
        for _ in 0..NUMBER_ATTEMPTS {
            let candidate = generate_reference(ORDER_NUMBER_PREFIX, now);

            if !self.orders.order_number_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(OrderError::NumberAllocation)
    }
}
