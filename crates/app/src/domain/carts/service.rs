//! Cart store.

use std::sync::Arc;

use crate::domain::{
    carts::{errors::CartError, models::CartLine, repository::CartsRepository},
    catalog::{CatalogRepository, models::BikeUuid},
};

/// The per-user mutable cart, validated against live stock on every mutation.
#[derive(Clone)]
pub struct CartStore {
    carts: Arc<dyn CartsRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl CartStore {
    #[must_use]
    pub fn new(carts: Arc<dyn CartsRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { carts, catalog }
    }

    /// Set the carted quantity for a bike.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: quantity was zero.
    /// - [`CartError::BikeNotFound`]: no such bike.
    /// - [`CartError::InsufficientStock`]: quantity exceeds live stock.
    /// - [`CartError::Sql`]: storage failure.
    pub async fn set_line(
        &self,
        user_email: &str,
        bike: BikeUuid,
        quantity: u32,
    ) -> Result<CartLine, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let record = self
            .catalog
            .get_bike(bike)
            .await?
            .ok_or(CartError::BikeNotFound(bike))?;

        if record.stock < i64::from(quantity) {
            return Err(CartError::InsufficientStock {
                bike,
                requested: quantity,
                available: record.stock,
            });
        }

        self.carts.upsert_line(user_email, bike, quantity).await?;

        Ok(CartLine { bike, quantity })
    }

    /// Remove a bike from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::BikeNotFound`] if the bike was not in the cart,
    /// or [`CartError::Sql`] on storage failure.
    pub async fn remove_line(&self, user_email: &str, bike: BikeUuid) -> Result<(), CartError> {
        if self.carts.remove_line(user_email, bike).await? {
            Ok(())
        } else {
            Err(CartError::BikeNotFound(bike))
        }
    }

    /// All lines in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Sql`] on storage failure.
    pub async fn lines(&self, user_email: &str) -> Result<Vec<CartLine>, CartError> {
        Ok(self.carts.get_lines(user_email).await?)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Sql`] on storage failure.
    pub async fn clear(&self, user_email: &str) -> Result<(), CartError> {
        Ok(self.carts.clear(user_email).await?)
    }
}
