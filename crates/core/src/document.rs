//! Quote documents
//!
//! Dealer quotes are approved offline, so they render to a printable text
//! document rather than a screen component: a bordered line-item table with a
//! right-aligned totals block and the validity date.

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Alignment, Style, Theme, object::Columns},
};
use thiserror::Error;

/// Errors that can occur when rendering a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// One rendered line of a quote.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLine {
    /// Bike name as snapshotted on the quote.
    pub name: String,

    /// Quantity quoted.
    pub quantity: u32,

    /// Dealer unit price.
    pub unit_price: Money<'static, Currency>,

    /// `unit_price × quantity`.
    pub line_total: Money<'static, Currency>,
}

/// A printable dealer quote.
#[derive(Debug, Clone)]
pub struct QuoteDocument {
    /// Human-readable quote number.
    pub number: String,

    /// Dealer the quote was prepared for.
    pub dealer_name: String,

    /// Dealer contact email.
    pub dealer_email: String,

    /// Line items.
    pub lines: SmallVec<[DocumentLine; 8]>,

    /// Sum of line totals.
    pub subtotal: Money<'static, Currency>,

    /// Tax on the subtotal.
    pub tax: Money<'static, Currency>,

    /// Quoted total.
    pub total: Money<'static, Currency>,

    /// Formatted validity date (the quote is advisory after this).
    pub valid_until: String,
}

impl QuoteDocument {
    /// Render the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), DocumentError> {
        writeln!(out, "Quote {}", self.number).map_err(|_err| DocumentError::IO)?;

        writeln!(
            out,
            "Prepared for {} <{}>",
            self.dealer_name, self.dealer_email
        )
        .map_err(|_err| DocumentError::IO)?;

        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Line Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                format!("{}", line.unit_price),
                format!("{}", line.line_total),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| DocumentError::IO)?;

        self.write_summary(&mut out)?;

        writeln!(out, "\nValid until {}", self.valid_until).map_err(|_err| DocumentError::IO)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), DocumentError> {
        let subtotal_label = " Subtotal:";
        let tax_label = " Tax:";
        let total_label = " Total:";

        let subtotal_val = format!("{}  ", self.subtotal);
        let tax_val = format!("{}  ", self.tax);
        let total_val = format!("{}  ", self.total);

        let label_width = display_width(subtotal_label)
            .max(display_width(tax_label))
            .max(display_width(total_label));

        let value_width = display_width(&subtotal_val)
            .max(display_width(&tax_val))
            .max(display_width(&total_val));

        write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;
        write_summary_line(out, tax_label, &tax_val, label_width, value_width)?;
        write_summary_line(out, total_label, &total_val, label_width, value_width)
    }
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), DocumentError> {
    let label_pad = label_col_width.saturating_sub(display_width(label));
    let value_pad = value_col_width.saturating_sub(display_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {}{value}",
        "",
        " ".repeat(value_pad)
    )
    .map_err(|_err| DocumentError::IO)
}

/// Width in characters; money strings contain multi-byte currency symbols.
fn display_width(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn test_document() -> QuoteDocument {
        QuoteDocument {
            number: "QT-20260101-A1B2".to_string(),
            dealer_name: "Coastline Motors".to_string(),
            dealer_email: "orders@coastlinemotors.example".to_string(),
            lines: smallvec![
                DocumentLine {
                    name: "Apex 650R".to_string(),
                    quantity: 12,
                    unit_price: Money::from_minor(800_000, USD),
                    line_total: Money::from_minor(9_600_000, USD),
                },
                DocumentLine {
                    name: "Trailhawk 250".to_string(),
                    quantity: 3,
                    unit_price: Money::from_minor(405_000, USD),
                    line_total: Money::from_minor(1_215_000, USD),
                },
            ],
            subtotal: Money::from_minor(10_815_000, USD),
            tax: Money::from_minor(1_081_500, USD),
            total: Money::from_minor(11_896_500, USD),
            valid_until: "2026-01-31".to_string(),
        }
    }

    #[test]
    fn write_to_renders_lines_and_summary() -> TestResult {
        let mut out = Vec::new();
        test_document().write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Quote QT-20260101-A1B2"));
        assert!(output.contains("Coastline Motors"));
        assert!(output.contains("Apex 650R"));
        assert!(output.contains("Trailhawk 250"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Tax:"));
        assert!(output.contains("Total:"));
        assert!(output.contains("Valid until 2026-01-31"));

        Ok(())
    }

    #[test]
    fn write_to_renders_empty_quote_header() -> TestResult {
        let mut document = test_document();
        document.lines = smallvec![];

        let mut out = Vec::new();
        document.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Item"));
        assert!(output.contains("Total:"));

        Ok(())
    }

    #[test]
    fn display_width_counts_characters_not_bytes() {
        assert_eq!(display_width("£1.00"), 5);
        assert_eq!(display_width("$1.00"), 5);
    }

    #[test]
    fn summary_values_align_to_a_column() -> TestResult {
        let mut out = Vec::new();
        test_document().write_summary(&mut out)?;

        let output = String::from_utf8(out)?;
        let ends: Vec<usize> = output
            .lines()
            .map(|line| display_width(line.trim_end()))
            .collect();

        // All three summary lines end at the same column (before the
        // two-space right margin is trimmed).
        assert!(
            ends.windows(2).all(|pair| pair.first() == pair.last()),
            "summary lines should align: {ends:?}"
        );

        Ok(())
    }
}
