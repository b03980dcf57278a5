//! Checkout service.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso};
use tracing::{error, warn};

use sprocket::{
    pricing::{PricingResult, price_quantity},
    roles::Role,
    totals::checkout_totals,
};

use crate::domain::{
    actor::Actor,
    carts::{CartsRepository, models::CartLine},
    catalog::{CatalogRepository, models::BikeUuid},
    checkout::{
        errors::CheckoutError,
        models::{CheckoutIntent, PricedLine},
    },
    orders::{
        errors::OrderError,
        models::{NewOrder, Order, PAYMENT_METHOD, ShippingAddress},
        service::OrderLedger,
    },
    payments::{PaymentNegotiator, SERVICE_CURRENCY},
    promos::{PromoApplication, PromoLedger, errors::PromoLedgerError},
    quotes::{
        errors::QuoteError,
        models::{DealerInfo, Quote},
        service::QuoteService,
    },
};

/// Orchestrates the checkout pipeline over the domain services.
///
/// Constructed once at process start with explicit handles — there is no
/// global connection or provider state anywhere below this.
#[derive(Clone)]
pub struct CheckoutService {
    catalog: Arc<dyn CatalogRepository>,
    carts: Arc<dyn CartsRepository>,
    promos: PromoLedger,
    payments: PaymentNegotiator,
    orders: OrderLedger,
    quotes: QuoteService,
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        carts: Arc<dyn CartsRepository>,
        promos: PromoLedger,
        payments: PaymentNegotiator,
        orders: OrderLedger,
        quotes: QuoteService,
    ) -> Self {
        Self {
            catalog,
            carts,
            promos,
            payments,
            orders,
            quotes,
        }
    }

    /// Price a quantity of one bike for a role, from the live catalog price.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::BikeNotFound`]: unknown bike.
    /// - [`CheckoutError::Pricing`]: invalid quantity or arithmetic failure.
    /// - [`CheckoutError::Sql`]: storage failure.
    pub async fn compute_price(
        &self,
        bike: BikeUuid,
        quantity: u32,
        role: Role,
    ) -> Result<PricingResult, CheckoutError> {
        let record = self
            .catalog
            .get_bike(bike)
            .await?
            .ok_or(CheckoutError::BikeNotFound(bike))?;

        Ok(price_quantity(
            Money::from_minor(record.price, iso::USD),
            quantity,
            role,
        )?)
    }

    /// Validate a promo code against a subtotal in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PromoLedgerError`] kinds unchanged — an invalid code is
    /// signalled, never swallowed into a zero discount.
    pub async fn apply_promo(
        &self,
        code: &str,
        subtotal: i64,
    ) -> Result<PromoApplication, PromoLedgerError> {
        self.promos
            .validate_and_apply(code, Money::from_minor(subtotal, iso::USD))
            .await
    }

    /// Checkout step one: price the actor's cart, apply an optional promo,
    /// and negotiate a payment authorization for the final total.
    ///
    /// No stock is decremented and nothing is persisted yet; the returned
    /// intent is the input to [`finalize_order`](Self::finalize_order).
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Validation`]: bad address or email, rejected before
    ///   any side effect.
    /// - [`CheckoutError::EmptyCart`]: nothing to buy.
    /// - [`CheckoutError::Promo`]: invalid promo code (caller may retry
    ///   without one).
    /// - [`CheckoutError::Payment`]: the provider declined the charge.
    /// - [`CheckoutError::BikeNotFound`] / [`CheckoutError::Pricing`] /
    ///   [`CheckoutError::Totals`] / [`CheckoutError::Sql`]: as named.
    pub async fn initiate_checkout(
        &self,
        actor: &Actor,
        address: &ShippingAddress,
        promo_code: Option<&str>,
    ) -> Result<CheckoutIntent, CheckoutError> {
        validate_email(&actor.email)?;
        validate_address(address)?;

        let cart_lines = self.carts.get_lines(&actor.email).await?;

        if cart_lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = self.price_lines(&merge_lines(cart_lines), actor.role).await?;

        let subtotal: i64 = lines.iter().map(|line| line.line_subtotal).sum();

        let (promo_code, discount) = match promo_code {
            Some(code) => {
                let application = self.apply_promo(code, subtotal).await?;

                (
                    Some(application.promo.code().to_string()),
                    application.discount,
                )
            }
            None => (None, Money::from_minor(0, iso::USD)),
        };

        let totals = checkout_totals(Money::from_minor(subtotal, iso::USD), discount)?;

        let authorization = self
            .payments
            .create_authorization(totals.total().to_minor_units(), SERVICE_CURRENCY)
            .await?;

        Ok(CheckoutIntent {
            lines,
            totals: totals.into(),
            promo_code,
            authorization,
        })
    }

    /// Checkout step two: confirm the authorization and commit the order.
    ///
    /// On success the actor's cart is cleared (a failure to clear is logged
    /// and ignored — the order is already committed). If the order cannot be
    /// persisted *after* the payment confirmed, the failure is fatal: it is
    /// logged with the payment reference and surfaced as
    /// [`CheckoutError::ReconciliationRequired`]. No automatic compensation
    /// is attempted.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Validation`]: bad address or email.
    /// - [`CheckoutError::Payment`]: confirmation declined, or the provider
    ///   became unreachable while confirming a real intent.
    /// - [`CheckoutError::ReconciliationRequired`]: see above.
    pub async fn finalize_order(
        &self,
        actor: &Actor,
        intent: CheckoutIntent,
        address: &ShippingAddress,
    ) -> Result<Order, CheckoutError> {
        validate_email(&actor.email)?;
        validate_address(address)?;

        self.payments
            .confirm_authorization(&intent.authorization)
            .await?;

        let payment_intent_id = intent.authorization.intent_id;

        let new_order = NewOrder {
            user_email: actor.email.clone(),
            lines: intent.lines.into_iter().map(Into::into).collect(),
            totals: intent.totals,
            promo_code: intent.promo_code,
            shipping_address: address.clone(),
            payment_method: PAYMENT_METHOD.to_string(),
            payment_intent_id: payment_intent_id.clone(),
        };

        match self.orders.commit(new_order).await {
            Ok(order) => {
                if let Err(clear_error) = self.carts.clear(&actor.email).await {
                    warn!(
                        user_email = %actor.email,
                        error = %clear_error,
                        "failed to clear cart after order commit"
                    );
                }

                Ok(order)
            }
            Err(source) => {
                error!(
                    %payment_intent_id,
                    error = %source,
                    "order persistence failed after payment confirmation; manual reconciliation required"
                );

                Err(CheckoutError::ReconciliationRequired {
                    payment_intent_id,
                    source,
                })
            }
        }
    }

    /// Fetch an order, scoped to its owner unless the actor is elevated.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] kinds unchanged.
    pub async fn get_order(&self, actor: &Actor, order_number: &str) -> Result<Order, OrderError> {
        self.orders.get(actor, order_number).await
    }

    /// Request an order status transition.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] kinds unchanged.
    pub async fn update_order_status(
        &self,
        actor: &Actor,
        order_number: &str,
        next: sprocket::status::OrderStatus,
    ) -> Result<Order, OrderError> {
        self.orders.update_status(actor, order_number, next).await
    }

    /// Cut a dealer quote from explicit cart lines.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError`] kinds unchanged.
    pub async fn request_quote(
        &self,
        dealer: DealerInfo,
        lines: &[CartLine],
    ) -> Result<Quote, QuoteError> {
        self.quotes.create(dealer, lines).await
    }

    /// Fetch a quote by number (expired quotes included).
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError`] kinds unchanged.
    pub async fn get_quote(&self, quote_number: &str) -> Result<Quote, QuoteError> {
        self.quotes.get(quote_number).await
    }

    async fn price_lines(
        &self,
        cart_lines: &[CartLine],
        role: Role,
    ) -> Result<Vec<PricedLine>, CheckoutError> {
        let mut lines = Vec::with_capacity(cart_lines.len());

        for cart_line in cart_lines {
            let bike = self
                .catalog
                .get_bike(cart_line.bike)
                .await?
                .ok_or(CheckoutError::BikeNotFound(cart_line.bike))?;

            let pricing = price_quantity(
                Money::from_minor(bike.price, iso::USD),
                cart_line.quantity,
                role,
            )?;

            lines.push(PricedLine {
                bike: bike.uuid,
                name: bike.name,
                quantity: cart_line.quantity,
                base_price: bike.price,
                unit_price: pricing.unit_price().to_minor_units(),
                line_subtotal: pricing.subtotal().to_minor_units(),
            });
        }

        Ok(lines)
    }
}

/// Collapse duplicate bike lines, keeping first-seen order. The dealer tier
/// is evaluated on the merged quantity, so splitting a bike across lines
/// cannot change its price.
fn merge_lines(cart_lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(cart_lines.len());
    let mut index: FxHashMap<BikeUuid, usize> = FxHashMap::default();

    for line in cart_lines {
        if let Some(&at) = index.get(&line.bike) {
            if let Some(existing) = merged.get_mut(at) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
        } else {
            index.insert(line.bike, merged.len());
            merged.push(line);
        }
    }

    merged
}

fn validate_email(email: &str) -> Result<(), CheckoutError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(CheckoutError::Validation("email"))
    }
}

fn validate_address(address: &ShippingAddress) -> Result<(), CheckoutError> {
    let required = [
        ("name", &address.name),
        ("line1", &address.line1),
        ("city", &address.city),
        ("state", &address.state),
        ("postal_code", &address.postal_code),
        ("country", &address.country),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(CheckoutError::Validation(field));
        }
    }

    Ok(())
}
