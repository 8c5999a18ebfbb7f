//! Aggregation
//!
//! Headline totals, largest cost increases and spend share by country. Every function here
//! accepts an empty slice and returns empty or zero aggregates for it.

use std::{cmp::Ordering, collections::BTreeMap};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use tracing::warn;

use crate::{items::Country, pricing::CostResult};

/// Number of items shown in top-N lists when the caller does not choose.
pub const DEFAULT_TOP_N: usize = 10;

/// Headline comparison of a scenario against its baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Number of costed items
    pub items: usize,

    /// Sum of baseline annual costs
    pub baseline: Decimal,

    /// Sum of scenario annual costs
    pub scenario: Decimal,

    /// `scenario − baseline`
    pub delta: Decimal,

    /// Set when a sum exceeded the representable range and was clamped.
    pub saturated: bool,
}

impl Totals {
    /// Delta as a fraction of the baseline total, zero when the baseline is zero.
    pub fn delta_ratio(&self) -> Decimal {
        self.delta
            .checked_div(self.baseline)
            .unwrap_or(Decimal::ZERO)
    }

    /// Delta as a percentage of the baseline total.
    pub fn delta_percentage(&self) -> Percentage {
        Percentage::from(self.delta_ratio())
    }
}

/// One supplier country's part of total scenario spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendShare {
    /// Supplier country
    pub country: Country,

    /// Scenario annual spend with this country
    pub spend: Decimal,

    /// Fraction of total scenario spend, in `[0, 1]`
    pub share: Decimal,
}

impl SpendShare {
    /// Share as a percentage
    pub fn percentage(&self) -> Percentage {
        Percentage::from(self.share)
    }
}

/// Aggregates derived from one scenario pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Headline totals
    pub totals: Totals,

    /// Largest cost increases first
    pub top_increases: Vec<CostResult>,

    /// Spend share per country, largest spend first
    pub spend_shares: Vec<SpendShare>,
}

/// Build the full summary for a set of cost results.
pub fn summarize(results: &[CostResult], top_n: usize) -> Summary {
    Summary {
        totals: totals(results),
        top_increases: top_increases(results, top_n).into_iter().cloned().collect(),
        spend_shares: spend_shares(results),
    }
}

/// Sum baseline and scenario costs.
///
/// Sums that overflow are clamped and flagged through [`Totals::saturated`].
pub fn totals(results: &[CostResult]) -> Totals {
    let baseline = checked_sum(results.iter().map(|r| r.baseline_annual_cost));
    let scenario = checked_sum(results.iter().map(|r| r.scenario_annual_cost));

    let delta = match (baseline, scenario) {
        (Some(baseline), Some(scenario)) => scenario.checked_sub(baseline),
        _ => None,
    };

    let saturated = delta.is_none();
    if saturated {
        warn!(items = results.len(), "aggregate totals exceeded the decimal range");
    }

    let baseline = baseline.unwrap_or(Decimal::MAX);
    let scenario = scenario.unwrap_or(Decimal::MAX);

    Totals {
        items: results.len(),
        baseline,
        scenario,
        delta: delta.unwrap_or_else(|| scenario.saturating_sub(baseline)),
        saturated,
    }
}

/// The `n` results with the largest delta, ties broken by SKU ascending.
pub fn top_increases(results: &[CostResult], n: usize) -> Vec<&CostResult> {
    let mut ranked: Vec<&CostResult> = results.iter().collect();

    ranked.sort_by(|a, b| by_delta_desc(a, b));
    ranked.truncate(n);

    ranked
}

fn by_delta_desc(a: &CostResult, b: &CostResult) -> Ordering {
    b.delta.cmp(&a.delta).then_with(|| a.sku.cmp(&b.sku))
}

/// Scenario spend grouped by supplier country.
pub fn spend_by_country(results: &[CostResult]) -> BTreeMap<Country, Decimal> {
    let mut spend = BTreeMap::new();

    for result in results {
        let entry = spend
            .entry(result.supplier_country.clone())
            .or_insert(Decimal::ZERO);

        *entry = entry.checked_add(result.scenario_annual_cost).unwrap_or_else(|| {
            warn!(country = %result.supplier_country, "country spend exceeded the decimal range");

            Decimal::MAX
        });
    }

    spend
}

/// Fraction of total scenario spend per supplier country.
///
/// All shares are zero when total scenario spend is zero.
pub fn spend_share(results: &[CostResult]) -> BTreeMap<Country, Decimal> {
    spend_shares(results)
        .into_iter()
        .map(|share| (share.country, share.share))
        .collect()
}

/// Spend shares ordered by spend descending, ties broken by country ascending.
pub fn spend_shares(results: &[CostResult]) -> Vec<SpendShare> {
    let by_country = spend_by_country(results);
    let total = checked_sum(by_country.values().copied()).unwrap_or_else(|| {
        warn!("total spend exceeded the decimal range");

        Decimal::MAX
    });

    let mut shares: Vec<SpendShare> = by_country
        .into_iter()
        .map(|(country, spend)| SpendShare {
            share: spend.checked_div(total).unwrap_or(Decimal::ZERO),
            country,
            spend,
        })
        .collect();

    shares.sort_by(|a, b| b.spend.cmp(&a.spend).then_with(|| a.country.cmp(&b.country)));

    shares
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, Decimal::checked_add)
}
