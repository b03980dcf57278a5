//! Conformance tests for the pricing schedule, promo rules and totals.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use sprocket::{
    pricing::{DealerTier, price_quantity},
    promos::{Promo, PromoError, PromoKind},
    roles::Role,
    status::OrderStatus,
    totals::{SHIPPING_FLAT_MINOR, checkout_totals},
};

#[test]
fn discount_schedule_matches_published_table() -> TestResult {
    let base = Money::from_minor(1_000_000, USD);

    let expected = [
        (5, Percentage::from(0.10)),
        (6, Percentage::from(0.15)),
        (10, Percentage::from(0.15)),
        (11, Percentage::from(0.20)),
        (20, Percentage::from(0.20)),
        (21, Percentage::from(0.25)),
    ];

    for (quantity, rate) in expected {
        let result = price_quantity(base, quantity, Role::Dealer)?;

        assert_eq!(result.discount_rate(), rate, "quantity {quantity}");
    }

    Ok(())
}

#[test]
fn discount_per_unit_never_decreases_with_quantity() -> TestResult {
    let base = Money::from_minor(777_777, USD);
    let mut previous = 0_i64;

    for quantity in 1..=60 {
        let result = price_quantity(base, quantity, Role::Dealer)?;
        let discount = result.discount_per_unit().to_minor_units();

        assert!(
            discount >= previous,
            "discount should not decrease at quantity {quantity}: {discount} < {previous}"
        );

        previous = discount;
    }

    Ok(())
}

#[test]
fn non_dealers_never_receive_a_discount() -> TestResult {
    let base = Money::from_minor(450_000, USD);

    for role in [
        Role::Anonymous,
        Role::Customer,
        Role::Merchandiser,
        Role::Admin,
    ] {
        for quantity in [1, 6, 21, 500] {
            let result = price_quantity(base, quantity, role)?;

            assert_eq!(result.savings(), Money::from_minor(0, USD), "{role}");
        }
    }

    Ok(())
}

#[test]
fn no_rounding_leak_across_every_tier() -> TestResult {
    // Prices chosen so every tier rate produces a fractional per-unit discount.
    for base_minor in [1, 99, 101, 999_99, 1_234_567] {
        let base = Money::from_minor(base_minor, USD);

        for quantity in [1, 5, 6, 10, 11, 20, 21, 99] {
            let result = price_quantity(base, quantity, Role::Dealer)?;

            let charged = result.subtotal().to_minor_units();
            let saved = result.total_discount().to_minor_units();

            assert_eq!(
                charged + saved,
                base_minor * i64::from(quantity),
                "base {base_minor} quantity {quantity}"
            );
        }
    }

    Ok(())
}

#[test]
fn dealer_orders_twelve_bikes_at_twenty_percent_off() -> TestResult {
    // The worked example: 12 × $10,000 at the 11-20 tier.
    let result = price_quantity(Money::from_minor(1_000_000, USD), 12, Role::Dealer)?;

    assert_eq!(result.tier(), Some(DealerTier::ElevenToTwenty));
    assert_eq!(result.unit_price(), Money::from_minor(800_000, USD));
    assert_eq!(result.subtotal(), Money::from_minor(9_600_000, USD));
    assert_eq!(result.savings(), Money::from_minor(2_400_000, USD));

    Ok(())
}

#[test]
fn fixed_promo_never_drives_the_total_negative() -> TestResult {
    let subtotal = Money::from_minor(30_000, USD);

    for promo_minor in [30_000, 30_001, 50_000, i64::from(u32::MAX)] {
        let promo = Promo::new(
            "ride500",
            PromoKind::Fixed(Money::from_minor(promo_minor, USD)),
            "",
            true,
        );

        let discount = promo.discount_on(subtotal)?;

        assert_eq!(discount, subtotal, "promo {promo_minor}");

        let totals = checkout_totals(subtotal, discount)?;

        assert_eq!(totals.tax(), Money::from_minor(0, USD));
        assert_eq!(totals.total(), Money::from_minor(SHIPPING_FLAT_MINOR, USD));
    }

    Ok(())
}

#[test]
fn promo_application_is_idempotent() -> TestResult {
    let promo = Promo::new("summer10", PromoKind::percent_points(10), "", true);
    let subtotal = Money::from_minor(123_457, USD);

    let first = promo.discount_on(subtotal)?;
    let second = promo.discount_on(subtotal)?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn inactive_promo_signals_rather_than_discounting_zero() {
    let promo = Promo::new("retired", PromoKind::percent_points(25), "", false);

    let result = promo.discount_on(Money::from_minor(10_000, USD));

    assert_eq!(result, Err(PromoError::Inactive("retired".to_string())));
}

#[test]
fn order_total_invariant_holds_with_a_promo() -> TestResult {
    let subtotal = Money::from_minor(9_600_000, USD);
    let promo = Promo::new("fleet5", PromoKind::percent_points(5), "", true);

    let discount = promo.discount_on(subtotal)?;
    let totals = checkout_totals(subtotal, discount)?;

    assert_eq!(discount, Money::from_minor(480_000, USD));
    assert_eq!(totals.tax(), Money::from_minor(912_000, USD));
    assert_eq!(
        totals.total().to_minor_units(),
        (9_600_000 - 480_000) + 912_000 + SHIPPING_FLAT_MINOR
    );

    Ok(())
}

#[test]
fn status_lifecycle_conforms() {
    assert!(
        OrderStatus::Confirmed
            .transition_to(OrderStatus::Cancelled)
            .is_ok()
    );
    assert!(
        OrderStatus::Shipped
            .transition_to(OrderStatus::Cancelled)
            .is_err()
    );
    assert!(
        OrderStatus::Delivered
            .transition_to(OrderStatus::Processing)
            .is_err()
    );
}
