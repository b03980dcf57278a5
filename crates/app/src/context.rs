//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartStore, PgCartsRepository},
        catalog::PgCatalogRepository,
        checkout::CheckoutService,
        orders::{OrderLedger, PgOrdersRepository},
        payments::{PaymentGateway, PaymentNegotiator, StripeConfig, StripeGateway},
        promos::{PgPromosRepository, PromoLedger},
        quotes::{PgQuotesRepository, QuoteService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Explicit handles to every engine service, built once at process start.
///
/// Persistence and the payment gateway are injected here rather than read
/// from any process-global state; everything below receives what it needs at
/// construction.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<CartStore>,
    pub promos: Arc<PromoLedger>,
    pub orders: Arc<OrderLedger>,
    pub quotes: Arc<QuoteService>,
    pub payments: Arc<PaymentNegotiator>,
    pub checkout: Arc<CheckoutService>,
}

impl AppContext {
    /// Build application context from a database URL and payment config.
    ///
    /// A missing Stripe secret key is not an error: the negotiator then runs
    /// in mock mode, which checkout reports through the `mock` flag on every
    /// authorization.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        payments_config: StripeConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let catalog = Arc::new(PgCatalogRepository::new(db.clone()));
        let carts_repository = Arc::new(PgCartsRepository::new(db.clone()));
        let orders_repository = Arc::new(PgOrdersRepository::new(db.clone()));
        let quotes_repository = Arc::new(PgQuotesRepository::new(db.clone()));
        let promos_repository = Arc::new(PgPromosRepository::new(db));

        let gateway = StripeGateway::from_config(payments_config)
            .map(|gateway| Arc::new(gateway) as Arc<dyn PaymentGateway>);

        let payments = PaymentNegotiator::new(gateway);
        let promos = PromoLedger::new(promos_repository);
        let orders = OrderLedger::new(orders_repository, catalog.clone());
        let quotes = QuoteService::new(quotes_repository, catalog.clone());
        let carts = CartStore::new(carts_repository.clone(), catalog.clone());

        let checkout = CheckoutService::new(
            catalog,
            carts_repository,
            promos.clone(),
            payments.clone(),
            orders.clone(),
            quotes.clone(),
        );

        Ok(Self {
            carts: Arc::new(carts),
            promos: Arc::new(promos),
            orders: Arc::new(orders),
            quotes: Arc::new(quotes),
            payments: Arc::new(payments),
            checkout: Arc::new(checkout),
        })
    }
}
