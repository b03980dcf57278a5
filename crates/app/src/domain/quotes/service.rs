//! Quote service.

use std::sync::Arc;

use jiff::{Timestamp, tz::TimeZone};
use rusty_money::{Money, iso};
use smallvec::SmallVec;
use tracing::info;

use sprocket::{
    document::{DocumentLine, QuoteDocument},
    pricing::price_quantity,
    roles::Role,
    totals::quote_totals,
};

use crate::domain::{
    carts::models::CartLine,
    catalog::CatalogRepository,
    quotes::{
        errors::QuoteError,
        models::{DealerInfo, QUOTE_VALIDITY, Quote, QuoteLine, QuoteUuid},
        repository::QuotesRepository,
    },
    reference::generate_reference,
};

/// Attempts at drawing an unused quote number before giving up.
const NUMBER_ATTEMPTS: usize = 5;

/// Prefix on generated quote numbers.
const QUOTE_NUMBER_PREFIX: &str = "QT";

/// Cuts and retrieves dealer quotes.
#[derive(Clone)]
pub struct QuoteService {
    quotes: Arc<dyn QuotesRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl QuoteService {
    #[must_use]
    pub fn new(quotes: Arc<dyn QuotesRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { quotes, catalog }
    }

    /// Cut a quote for a dealer from cart lines.
    ///
    /// Prices every line at the dealer volume tier and applies the checkout
    /// tax rule, but creates no payment authorization and decrements no stock
    /// — a quote is non-binding. `expires_at` is exactly
    /// [`QUOTE_VALIDITY`] after `created_at`.
    ///
    /// # Errors
    ///
    /// - [`QuoteError::Validation`]: blank dealer name or unusable email.
    /// - [`QuoteError::Empty`]: no lines.
    /// - [`QuoteError::BikeNotFound`]: a line references an unknown bike.
    /// - [`QuoteError::Pricing`] / [`QuoteError::Totals`]: arithmetic failure.
    /// - [`QuoteError::NumberAllocation`]: no unused number after retries.
    /// - [`QuoteError::Sql`]: storage failure.
    pub async fn create(
        &self,
        dealer: DealerInfo,
        lines: &[CartLine],
    ) -> Result<Quote, QuoteError> {
        if dealer.name.trim().is_empty() {
            return Err(QuoteError::Validation("dealer name"));
        }

        if !dealer.email.contains('@') {
            return Err(QuoteError::Validation("dealer email"));
        }

        if lines.is_empty() {
            return Err(QuoteError::Empty);
        }

        let mut quote_lines = Vec::with_capacity(lines.len());
        let mut subtotal = Money::from_minor(0, iso::USD);

        for line in lines {
            let bike = self
                .catalog
                .get_bike(line.bike)
                .await?
                .ok_or(QuoteError::BikeNotFound(line.bike))?;

            let pricing = price_quantity(
                Money::from_minor(bike.price, iso::USD),
                line.quantity,
                Role::Dealer,
            )?;

            subtotal = Money::from_minor(
                subtotal.to_minor_units() + pricing.subtotal().to_minor_units(),
                iso::USD,
            );

            quote_lines.push(QuoteLine {
                bike: bike.uuid,
                name: bike.name,
                quantity: line.quantity,
                base_price: bike.price,
                unit_price: pricing.unit_price().to_minor_units(),
                line_total: pricing.subtotal().to_minor_units(),
            });
        }

        let totals = quote_totals(subtotal)?;

        let created_at = Timestamp::now();
        let quote_number = self.allocate_quote_number(created_at).await?;

        let quote = Quote {
            uuid: QuoteUuid::new(),
            quote_number,
            dealer,
            lines: quote_lines,
            subtotal: totals.subtotal().to_minor_units(),
            tax: totals.tax().to_minor_units(),
            total: totals.total().to_minor_units(),
            created_at,
            expires_at: created_at + QUOTE_VALIDITY,
        };

        self.quotes.insert_quote(&quote).await?;

        info!(
            quote_number = %quote.quote_number,
            total = quote.total,
            "quote created"
        );

        Ok(quote)
    }

    /// Fetch a quote by number. Expired quotes are still returned — they
    /// remain readable for audit, and [`Quote::is_expired`] tells the caller
    /// whether to treat the terms as actionable.
    ///
    /// # Errors
    ///
    /// - [`QuoteError::NotFound`]: unknown quote number.
    /// - [`QuoteError::Sql`]: storage failure.
    pub async fn get(&self, quote_number: &str) -> Result<Quote, QuoteError> {
        self.quotes
            .get_quote(quote_number)
            .await?
            .ok_or_else(|| QuoteError::NotFound(quote_number.to_string()))
    }

    /// Build the printable document for a quote.
    #[must_use]
    pub fn document(quote: &Quote) -> QuoteDocument {
        let lines: SmallVec<[DocumentLine; 8]> = quote
            .lines
            .iter()
            .map(|line| DocumentLine {
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: Money::from_minor(line.unit_price, iso::USD),
                line_total: Money::from_minor(line.line_total, iso::USD),
            })
            .collect();

        QuoteDocument {
            number: quote.quote_number.clone(),
            dealer_name: quote.dealer.name.clone(),
            dealer_email: quote.dealer.email.clone(),
            lines,
            subtotal: Money::from_minor(quote.subtotal, iso::USD),
            tax: Money::from_minor(quote.tax, iso::USD),
            total: Money::from_minor(quote.total, iso::USD),
            valid_until: quote
                .expires_at
                .to_zoned(TimeZone::UTC)
                .strftime("%Y-%m-%d")
                .to_string(),
        }
    }

    async fn allocate_quote_number(&self, now: Timestamp) -> Result<String, QuoteError> {
        for _ in 0..NUMBER_ATTEMPTS {
            let candidate = generate_reference(QUOTE_NUMBER_PREFIX, now);

            if !self.quotes.quote_number_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(QuoteError::NumberAllocation)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::{
        catalog::{
            MockCatalogRepository,
            models::{Bike, BikeUuid},
        },
        quotes::repository::MockQuotesRepository,
    };

    use super::*;

    fn dealer() -> DealerInfo {
        DealerInfo {
            name: "Coastline Motors".to_string(),
            email: "orders@coastlinemotors.example".to_string(),
        }
    }

    fn catalog_with(price: i64) -> MockCatalogRepository {
        let mut catalog = MockCatalogRepository::new();

        catalog.expect_get_bike().returning(move |uuid| {
            Ok(Some(Bike {
                uuid,
                name: "Apex 650R".to_string(),
                price,
                stock: 100,
                created_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
            }))
        });

        catalog
    }

    fn service(quotes: MockQuotesRepository, catalog: MockCatalogRepository) -> QuoteService {
        QuoteService::new(Arc::new(quotes), Arc::new(catalog))
    }

    #[tokio::test]
    async fn quote_prices_at_dealer_tier_without_shipping() -> TestResult {
        let bike = BikeUuid::new();

        let mut quotes = MockQuotesRepository::new();
        quotes.expect_quote_number_exists().returning(|_| Ok(false));
        quotes.expect_insert_quote().once().returning(|_| Ok(()));

        let quote = service(quotes, catalog_with(1_000_000))
            .create(
                dealer(),
                &[CartLine {
                    bike,
                    quantity: 12,
                }],
            )
            .await?;

        // 12 units at the 11-20 tier: $8,000 each.
        assert_eq!(quote.subtotal, 9_600_000);
        assert_eq!(quote.tax, 960_000);
        assert_eq!(quote.total, 10_560_000);
        assert!(quote.quote_number.starts_with("QT-"));

        let line = quote.lines.first().ok_or("expected one line")?;

        assert_eq!(line.unit_price, 800_000);
        assert_eq!(line.base_price, 1_000_000);

        Ok(())
    }

    #[tokio::test]
    async fn validity_window_is_exactly_thirty_days() -> TestResult {
        let bike = BikeUuid::new();

        let mut quotes = MockQuotesRepository::new();
        quotes.expect_quote_number_exists().returning(|_| Ok(false));
        quotes.expect_insert_quote().returning(|_| Ok(()));

        let quote = service(quotes, catalog_with(500_000))
            .create(dealer(), &[CartLine { bike, quantity: 1 }])
            .await?;

        assert_eq!(
            quote.expires_at.duration_since(quote.created_at),
            QUOTE_VALIDITY
        );

        Ok(())
    }

    #[tokio::test]
    async fn expired_quotes_remain_readable() -> TestResult {
        let bike = BikeUuid::new();
        let created_at = Timestamp::UNIX_EPOCH;

        let stored = Quote {
            uuid: QuoteUuid::new(),
            quote_number: "QT-19700101-OLD1".to_string(),
            dealer: dealer(),
            lines: vec![QuoteLine {
                bike,
                name: "Apex 650R".to_string(),
                quantity: 1,
                base_price: 1_000_000,
                unit_price: 900_000,
                line_total: 900_000,
            }],
            subtotal: 900_000,
            tax: 90_000,
            total: 990_000,
            created_at,
            expires_at: created_at + QUOTE_VALIDITY,
        };

        let mut quotes = MockQuotesRepository::new();
        let fixture = stored.clone();
        quotes
            .expect_get_quote()
            .returning(move |_| Ok(Some(fixture.clone())));

        let catalog = MockCatalogRepository::new();

        let quote = service(quotes, catalog).get("QT-19700101-OLD1").await?;

        assert!(quote.is_expired(Timestamp::now()));

        Ok(())
    }

    #[tokio::test]
    async fn blank_dealer_name_is_rejected_before_any_lookup() {
        let quotes = MockQuotesRepository::new();
        let catalog = MockCatalogRepository::new();

        let result = service(quotes, catalog)
            .create(
                DealerInfo {
                    name: "  ".to_string(),
                    email: "orders@example.com".to_string(),
                },
                &[CartLine {
                    bike: BikeUuid::new(),
                    quantity: 1,
                }],
            )
            .await;

        assert!(matches!(result, Err(QuoteError::Validation("dealer name"))));
    }

    #[tokio::test]
    async fn empty_line_list_is_rejected() {
        let quotes = MockQuotesRepository::new();
        let catalog = MockCatalogRepository::new();

        let result = service(quotes, catalog).create(dealer(), &[]).await;

        assert!(matches!(result, Err(QuoteError::Empty)));
    }

    #[tokio::test]
    async fn document_carries_quote_numbers_and_validity() -> TestResult {
        let bike = BikeUuid::new();

        let mut quotes = MockQuotesRepository::new();
        quotes.expect_quote_number_exists().returning(|_| Ok(false));
        quotes.expect_insert_quote().returning(|_| Ok(()));

        let quote = service(quotes, catalog_with(1_000_000))
            .create(dealer(), &[CartLine { bike, quantity: 2 }])
            .await?;

        let document = QuoteService::document(&quote);

        let mut rendered = Vec::new();
        document.write_to(&mut rendered)?;

        let output = String::from_utf8(rendered)?;

        assert!(output.contains(&quote.quote_number));
        assert!(output.contains("Coastline Motors"));

        Ok(())
    }
}
