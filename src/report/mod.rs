//! Report
//!
//! Renders a [`ScenarioReport`] as terminal tables and as a CSV export.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Object, Rows},
    },
};
use thiserror::Error;

use crate::{items::Item, scenario::ScenarioReport};

pub mod export;

/// Errors that can occur while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error writing the report
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    /// CSV export error
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl ScenarioReport {
    /// Writes the headline figures and every table to `out`.
    ///
    /// `items` must be the slice the report was evaluated from; it supplies product names.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be displayed or writing fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        items: &[Item],
        currency: &'static Currency,
        top_n: usize,
    ) -> Result<(), ReportError> {
        write_headline(&mut out, self, currency)?;

        write_section(
            &mut out,
            "Impact by SKU (largest increases)",
            impact_table(self, items, currency),
        )?;

        write_section(
            &mut out,
            "Country spend share (scenario)",
            spend_table(self, currency),
        )?;

        if self.recommendations.is_empty() {
            writeln!(out, "\nNo cheaper supplier country found for any item.")?;
        } else {
            write_section(
                &mut out,
                "Recommendations (largest annual savings)",
                recommendation_table(self, items, currency, top_n),
            )?;
        }

        if !self.rejected.is_empty() {
            write_section(&mut out, "Rejected items", rejected_table(self))?;
        }

        Ok(())
    }
}

fn write_headline(
    out: &mut impl io::Write,
    report: &ScenarioReport,
    currency: &'static Currency,
) -> Result<(), ReportError> {
    let totals = &report.summary.totals;
    let delta_points = percent_points(totals.delta_percentage());

    let mut builder = Builder::default();

    builder.push_record(["SKUs", "Baseline", "Scenario", "Delta"]);
    builder.push_record([
        totals.items.to_string(),
        money(totals.baseline, currency),
        money(totals.scenario, currency),
        format!("{} ({delta_points:.1}%)", money(totals.delta, currency)),
    ]);

    let mut table = builder.build();
    style(&mut table, 0..4);

    writeln!(out, "{table}")?;

    if totals.saturated {
        writeln!(out, "Totals exceeded the representable range and are clamped.")?;
    }

    Ok(())
}

fn impact_table(
    report: &ScenarioReport,
    items: &[Item],
    currency: &'static Currency,
) -> Table {
    let mut builder = Builder::default();

    builder.push_record([
        "SKU",
        "Product",
        "Country",
        "Tariff",
        "Baseline",
        "Scenario",
        "Delta",
    ]);

    for result in &report.summary.top_increases {
        let rate_points = percent_points(Percentage::from(result.tariff_rate));
        let rate = if result.unrated {
            format!("{rate_points:.1}% (unrated)")
        } else {
            format!("{rate_points:.1}%")
        };

        builder.push_record([
            result.sku.clone(),
            product_name(items, result.item_index),
            result.supplier_country.to_string(),
            rate,
            money(result.baseline_annual_cost, currency),
            money(result.scenario_annual_cost, currency),
            money(result.delta, currency),
        ]);
    }

    let mut table = builder.build();
    style(&mut table, 3..7);

    for (idx, result) in report.summary.top_increases.iter().enumerate() {
        let color = match result.delta.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => Color::FG_RED,
            std::cmp::Ordering::Less => Color::FG_GREEN,
            std::cmp::Ordering::Equal => continue,
        };

        table.modify((idx + 1, 6), color);
    }

    table
}

fn spend_table(report: &ScenarioReport, currency: &'static Currency) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Country", "Spend", "Share"]);

    for share in &report.summary.spend_shares {
        builder.push_record([
            share.country.to_string(),
            money(share.spend, currency),
            format!("{:.1}%", percent_points(share.percentage())),
        ]);
    }

    let mut table = builder.build();
    style(&mut table, 1..3);

    table
}

fn recommendation_table(
    report: &ScenarioReport,
    items: &[Item],
    currency: &'static Currency,
    top_n: usize,
) -> Table {
    let mut builder = Builder::default();

    builder.push_record([
        "SKU",
        "Product",
        "Current",
        "Suggested",
        "Saved / unit",
        "Annual saved",
        "Current unit",
        "Suggested unit",
        "Units",
    ]);

    for rec in report.top_savings(top_n) {
        let units = items
            .get(rec.item_index)
            .map(|item| item.annual_units.to_string())
            .unwrap_or_default();

        builder.push_record([
            rec.sku.clone(),
            product_name(items, rec.item_index),
            rec.current_country.to_string(),
            rec.suggested_country.to_string(),
            money(rec.savings_per_unit(), currency),
            money(rec.projected_savings, currency),
            money(rec.current_unit_cost, currency),
            money(rec.suggested_unit_cost, currency),
            units,
        ]);
    }

    let mut table = builder.build();
    style(&mut table, 4..9);
    table.modify(Columns::new(5..6).not(Rows::first()), Color::FG_GREEN);

    table
}

fn rejected_table(report: &ScenarioReport) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Row", "SKU", "Reason"]);

    for rejection in &report.rejected {
        builder.push_record([
            (rejection.item_index + 1).to_string(),
            rejection.error.sku().to_string(),
            rejection.error.to_string(),
        ]);
    }

    let mut table = builder.build();
    style(&mut table, 0..1);

    table
}

fn write_section(out: &mut impl io::Write, title: &str, table: Table) -> Result<(), ReportError> {
    writeln!(out, "\n\x1b[1m{title}\x1b[0m\n{table}")?;

    Ok(())
}

fn style(table: &mut Table, numeric_columns: std::ops::Range<usize>) {
    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric_columns), Alignment::right());
}

fn product_name(items: &[Item], item_index: usize) -> String {
    items
        .get(item_index)
        .map(|item| item.product_name.clone())
        .unwrap_or_default()
}

/// Formats a decimal amount as money, rounded to minor units.
///
/// Amounts too large for minor units are printed as a plain decimal with the currency code.
fn money(amount: Decimal, currency: &'static Currency) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    match rounded
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
    {
        Some(minor) => Money::from_minor(minor, currency).to_string(),
        None => format!("{rounded:.2} {}", currency.iso_alpha_code),
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        aggregation::DEFAULT_TOP_N,
        scenario::evaluate,
        tariffs::{ScenarioConfig, TariffTable},
    };

    use super::*;

    fn sample() -> TestResult<(Vec<Item>, ScenarioReport)> {
        let rates = TariffTable::from_rates([("CN", dec!(0.25)), ("VN", dec!(0.05))])?;
        let config = ScenarioConfig::new(rates, dec!(1.1))?;
        let items = vec![
            Item::new("A1", dec!(10.0), "CN", 100).with_product_name("Widget A"),
            Item::new("A2", dec!(4.0), "VN", 50).with_product_name("Widget B"),
            Item::new("BAD", dec!(-1.0), "VN", 50),
        ];

        let report = evaluate(&items, &config, DEFAULT_TOP_N);

        Ok((items, report))
    }

    #[test]
    fn write_to_renders_every_section() -> TestResult {
        let (items, report) = sample()?;
        let mut out = Vec::new();

        report.write_to(&mut out, &items, USD, DEFAULT_TOP_N)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Impact by SKU"), "missing impact table");
        assert!(rendered.contains("Widget A"), "missing product name");
        assert!(rendered.contains("Country spend share"), "missing spend table");
        assert!(rendered.contains("Recommendations"), "missing recommendations");
        assert!(rendered.contains("Rejected items"), "missing rejections");
        assert!(rendered.contains("BAD"), "missing rejected sku");

        Ok(())
    }

    #[test]
    fn write_to_notes_when_nothing_to_recommend() -> TestResult {
        let rates = TariffTable::from_rates([("CN", dec!(0.25))])?;
        let config = ScenarioConfig::new(rates, Decimal::ONE)?;
        let items = [Item::new("A1", dec!(10.0), "CN", 100)];
        let report = evaluate(&items, &config, DEFAULT_TOP_N);
        let mut out = Vec::new();

        report.write_to(&mut out, &items, USD, DEFAULT_TOP_N)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("No cheaper supplier country"), "missing note");
        assert!(!rendered.contains("Rejected items"), "unexpected rejections");

        Ok(())
    }

    #[test]
    fn write_to_notes_clamped_totals() -> TestResult {
        let rates = TariffTable::from_rates([("US", Decimal::ZERO)])?;
        let config = ScenarioConfig::new(rates, Decimal::ONE)?;
        let big = Decimal::MAX - Decimal::ONE;
        let items = [Item::new("X1", big, "US", 1), Item::new("X2", big, "US", 1)];
        let report = evaluate(&items, &config, DEFAULT_TOP_N);
        let mut out = Vec::new();

        report.write_to(&mut out, &items, USD, DEFAULT_TOP_N)?;

        let rendered = String::from_utf8(out)?;

        assert!(report.summary.totals.saturated, "totals should be flagged");
        assert!(rendered.contains("clamped"), "missing clamped note");

        Ok(())
    }

    #[test]
    fn percent_points_scales_fraction() {
        assert_eq!(percent_points(Percentage::from(dec!(0.375))), dec!(37.5));
    }

    #[test]
    fn money_rounds_to_minor_units() {
        assert_eq!(
            money(dec!(13.755), USD),
            Money::from_minor(1376, USD).to_string()
        );
    }

    #[test]
    fn money_beyond_minor_units_prints_plain_decimal() {
        assert_eq!(
            money(dec!(1000000000000000000), USD),
            "1000000000000000000.00 USD"
        );
    }

    #[test]
    fn write_to_renders_totals_beyond_minor_units() -> TestResult {
        let rates = TariffTable::from_rates([("CN", dec!(0.25)), ("VN", dec!(0.05))])?;
        let config = ScenarioConfig::new(rates, Decimal::ONE)?;
        let items = [Item::new("BULK", dec!(1000000), "CN", 1_000_000_000_000)];
        let report = evaluate(&items, &config, DEFAULT_TOP_N);
        let mut out = Vec::new();

        report.write_to(&mut out, &items, USD, DEFAULT_TOP_N)?;

        let rendered = String::from_utf8(out)?;

        assert!(report.rejected.is_empty(), "nothing should be rejected");
        assert!(rendered.contains("1250000000000000000.00 USD"), "missing scenario total");

        Ok(())
    }
}
