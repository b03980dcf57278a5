//! Order status lifecycle
//!
//! Orders move forward through fulfilment and can only be cancelled before
//! they ship. There is no deletion; cancellation is the terminal "soft" state.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from status parsing and transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    /// The requested transition is not in the lifecycle graph.
    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition {
        /// The order's current status.
        from: OrderStatus,
        /// The rejected target status.
        to: OrderStatus,
    },

    /// A stored status string did not match any known status.
    #[error("unknown order status {0:?}")]
    Unknown(String),
}

/// Where an order is in its lifecycle.
///
/// The graph is `confirmed → processing → shipped → delivered`, with
/// `cancelled` reachable from `confirmed` and `processing` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Payment accepted, order recorded.
    Confirmed,

    /// Being prepared for shipment.
    Processing,

    /// Handed to the carrier; cancellation is no longer possible.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Cancelled before shipping.
    Cancelled,
}

impl OrderStatus {
    /// Whether the lifecycle graph permits moving to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Confirmed, OrderStatus::Processing)
                | (OrderStatus::Processing, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
                | (
                    OrderStatus::Confirmed | OrderStatus::Processing,
                    OrderStatus::Cancelled
                )
        )
    }

    /// Move to `next`, or reject the request leaving the order unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::InvalidTransition`] when the graph does not
    /// permit the move.
    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, StatusError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Stable lowercase name, matching the stored form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(StatusError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn forward_path_is_permitted() -> TestResult {
        let status = OrderStatus::Confirmed
            .transition_to(OrderStatus::Processing)?
            .transition_to(OrderStatus::Shipped)?
            .transition_to(OrderStatus::Delivered)?;

        assert_eq!(status, OrderStatus::Delivered);
        assert!(status.is_terminal());

        Ok(())
    }

    #[test]
    fn cancellation_is_permitted_before_shipping() -> TestResult {
        assert_eq!(
            OrderStatus::Confirmed.transition_to(OrderStatus::Cancelled)?,
            OrderStatus::Cancelled
        );
        assert_eq!(
            OrderStatus::Processing.transition_to(OrderStatus::Cancelled)?,
            OrderStatus::Cancelled
        );

        Ok(())
    }

    #[test]
    fn cancellation_after_shipping_is_rejected() {
        let result = OrderStatus::Shipped.transition_to(OrderStatus::Cancelled);

        assert_eq!(
            result,
            Err(StatusError::InvalidTransition {
                from: OrderStatus::Shipped,
                to: OrderStatus::Cancelled,
            })
        );

        assert!(
            OrderStatus::Delivered
                .transition_to(OrderStatus::Cancelled)
                .is_err()
        );
    }

    #[test]
    fn backward_moves_are_rejected() {
        assert!(
            OrderStatus::Delivered
                .transition_to(OrderStatus::Processing)
                .is_err()
        );
        assert!(
            OrderStatus::Shipped
                .transition_to(OrderStatus::Confirmed)
                .is_err()
        );
        assert!(
            OrderStatus::Cancelled
                .transition_to(OrderStatus::Processing)
                .is_err()
        );
    }

    #[test]
    fn skipping_states_is_rejected() {
        assert!(
            OrderStatus::Confirmed
                .transition_to(OrderStatus::Shipped)
                .is_err()
        );
        assert!(
            OrderStatus::Confirmed
                .transition_to(OrderStatus::Delivered)
                .is_err()
        );
    }

    #[test]
    fn status_round_trips_through_strings() -> TestResult {
        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        Ok(())
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        let result = "refunded".parse::<OrderStatus>();

        assert_eq!(result, Err(StatusError::Unknown("refunded".to_string())));
    }
}
