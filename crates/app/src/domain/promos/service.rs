//! Promo ledger.

use std::sync::Arc;

use rusty_money::{Money, iso::Currency};
use tracing::info;

use sprocket::{
    promos::{Promo, PromoError},
    roles::Role,
};

use crate::domain::{
    actor::Actor,
    promos::{errors::PromoLedgerError, models::NewPromo, repository::PromosRepository},
};

/// The outcome of validating and applying a promo code.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoApplication {
    /// The promo that was applied.
    pub promo: Promo,

    /// The discount it grants on the given subtotal.
    pub discount: Money<'static, Currency>,
}

/// Stateless promo lookup and application, plus admin-only management.
#[derive(Clone)]
pub struct PromoLedger {
    promos: Arc<dyn PromosRepository>,
}

impl PromoLedger {
    #[must_use]
    pub fn new(promos: Arc<dyn PromosRepository>) -> Self {
        Self { promos }
    }

    /// Look up a code (case-insensitively) and compute its discount against a
    /// subtotal. Exactly one promo applies per order; stacking is unsupported.
    ///
    /// # Errors
    ///
    /// - [`PromoError::NotFound`] / [`PromoError::Inactive`] via
    ///   [`PromoLedgerError::Promo`]: invalid code; the caller decides whether
    ///   to retry checkout without one.
    /// - [`PromoLedgerError::Sql`]: storage failure.
    pub async fn validate_and_apply(
        &self,
        code: &str,
        subtotal: Money<'static, Currency>,
    ) -> Result<PromoApplication, PromoLedgerError> {
        let promo = self
            .promos
            .get_promo(code)
            .await?
            .ok_or_else(|| PromoError::NotFound(code.to_lowercase()))?;

        let discount = promo.discount_on(subtotal)?;

        Ok(PromoApplication { promo, discount })
    }

    /// Create a promo. Admin only.
    ///
    /// # Errors
    ///
    /// - [`PromoLedgerError::Forbidden`]: the actor is not an admin.
    /// - [`PromoLedgerError::InvalidRate`]: percentage not in whole points.
    /// - [`PromoLedgerError::AlreadyExists`]: code is taken.
    /// - [`PromoLedgerError::Sql`]: storage failure.
    pub async fn create(&self, actor: &Actor, new_promo: NewPromo) -> Result<Promo, PromoLedgerError> {
        require_admin(actor)?;

        if new_promo.kind.magnitude().is_none() {
            return Err(PromoLedgerError::InvalidRate);
        }

        let promo = Promo::new(&new_promo.code, new_promo.kind, &new_promo.description, true);

        self.promos.create_promo(&promo).await?;

        info!(code = promo.code(), "promo created");

        Ok(promo)
    }

    /// Deactivate a promo. Admin only.
    ///
    /// # Errors
    ///
    /// - [`PromoLedgerError::Forbidden`]: the actor is not an admin.
    /// - [`PromoError::NotFound`] via [`PromoLedgerError::Promo`]: unknown code.
    /// - [`PromoLedgerError::Sql`]: storage failure.
    pub async fn deactivate(&self, actor: &Actor, code: &str) -> Result<(), PromoLedgerError> {
        require_admin(actor)?;

        if self.promos.set_active(code, false).await? {
            info!(code = %code.to_lowercase(), "promo deactivated");

            Ok(())
        } else {
            Err(PromoError::NotFound(code.to_lowercase()).into())
        }
    }
}

fn require_admin(actor: &Actor) -> Result<(), PromoLedgerError> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(PromoLedgerError::Forbidden(actor.role))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use sprocket::promos::PromoKind;

    use crate::domain::promos::repository::MockPromosRepository;

    use super::*;

    fn ledger(promos: MockPromosRepository) -> PromoLedger {
        PromoLedger::new(Arc::new(promos))
    }

    fn admin() -> Actor {
        Actor::new("ops@example.com", Role::Admin)
    }

    #[tokio::test]
    async fn validate_and_apply_discounts_subtotal() -> TestResult {
        let mut promos = MockPromosRepository::new();
        promos.expect_get_promo().returning(|code| {
            Ok(Some(Promo::new(
                code,
                PromoKind::percent_points(10),
                "",
                true,
            )))
        });

        let application = ledger(promos)
            .validate_and_apply("SUMMER10", Money::from_minor(250_000, USD))
            .await?;

        assert_eq!(application.discount, Money::from_minor(25_000, USD));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let mut promos = MockPromosRepository::new();
        promos.expect_get_promo().returning(|_| Ok(None));

        let result = ledger(promos)
            .validate_and_apply("NOPE", Money::from_minor(10_000, USD))
            .await;

        assert!(matches!(
            result,
            Err(PromoLedgerError::Promo(PromoError::NotFound(code))) if code == "nope"
        ));
    }

    #[tokio::test]
    async fn inactive_code_signals_rather_than_zeroing() {
        let mut promos = MockPromosRepository::new();
        promos.expect_get_promo().returning(|code| {
            Ok(Some(Promo::new(
                code,
                PromoKind::percent_points(10),
                "",
                false,
            )))
        });

        let result = ledger(promos)
            .validate_and_apply("retired", Money::from_minor(10_000, USD))
            .await;

        assert!(matches!(
            result,
            Err(PromoLedgerError::Promo(PromoError::Inactive(_)))
        ));
    }

    #[tokio::test]
    async fn create_requires_admin() {
        let promos = MockPromosRepository::new();

        let result = ledger(promos)
            .create(
                &Actor::new("staff@example.com", Role::Merchandiser),
                NewPromo {
                    code: "RIDE500".to_string(),
                    kind: PromoKind::Fixed(Money::from_minor(50_000, USD)),
                    description: String::new(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(PromoLedgerError::Forbidden(Role::Merchandiser))
        ));
    }

    #[tokio::test]
    async fn create_stores_normalised_promo() -> TestResult {
        let mut promos = MockPromosRepository::new();
        promos
            .expect_create_promo()
            .withf(|promo| promo.code() == "ride500" && promo.is_active())
            .once()
            .returning(|_| Ok(()));

        let promo = ledger(promos)
            .create(
                &admin(),
                NewPromo {
                    code: "RIDE500".to_string(),
                    kind: PromoKind::Fixed(Money::from_minor(50_000, USD)),
                    description: "$500 off".to_string(),
                },
            )
            .await?;

        assert_eq!(promo.code(), "ride500");

        Ok(())
    }

    #[tokio::test]
    async fn deactivate_unknown_code_is_not_found() {
        let mut promos = MockPromosRepository::new();
        promos.expect_set_active().returning(|_, _| Ok(false));

        let result = ledger(promos).deactivate(&admin(), "ghost").await;

        assert!(matches!(
            result,
            Err(PromoLedgerError::Promo(PromoError::NotFound(_)))
        ));
    }
}
