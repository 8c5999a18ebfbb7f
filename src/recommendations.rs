//! Recommendations
//!
//! Rule-based alternate sourcing: re-cost each item under every other known country and
//! suggest the cheapest one when it beats the item's own scenario cost.

use rust_decimal::Decimal;
use tracing::trace;

use crate::{
    items::{Country, Item},
    pricing::{CostResult, annualize, landed_unit_cost},
    tariffs::ScenarioConfig,
};

/// A cheaper supplier country for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    /// Position of the source item in the input slice
    pub item_index: usize,

    /// SKU of the source item
    pub sku: String,

    /// Country the item is sourced from today
    pub current_country: Country,

    /// Cheapest alternative country
    pub suggested_country: Country,

    /// Scenario unit cost from the current country
    pub current_unit_cost: Decimal,

    /// Scenario unit cost from the suggested country
    pub suggested_unit_cost: Decimal,

    /// Scenario annual cost from the current country
    pub current_annual_cost: Decimal,

    /// Scenario annual cost from the suggested country
    pub projected_annual_cost: Decimal,

    /// `current_annual_cost − projected_annual_cost`, always positive.
    pub projected_savings: Decimal,
}

impl Recommendation {
    /// Unit cost saved by switching
    pub fn savings_per_unit(&self) -> Decimal {
        self.current_unit_cost
            .saturating_sub(self.suggested_unit_cost)
    }
}

/// Find the cheapest alternative supplier country for a costed item.
///
/// Countries are scanned alphabetically and only a strictly lower cost replaces the current
/// best, so ties go to the alphabetically first country. Returns `None` when no alternative
/// is strictly cheaper than the item's own scenario cost.
pub fn recommend(item: &Item, result: &CostResult, config: &ScenarioConfig) -> Option<Recommendation> {
    let fx = config.fx_multiplier();
    let mut best: Option<(&Country, Decimal, Decimal)> = None;

    for (country, rate) in config.rates() {
        if *country == item.supplier_country {
            continue;
        }

        let Some(unit_cost) = landed_unit_cost(item.base_cost, *rate, fx) else {
            continue;
        };
        let Some(annual_cost) = annualize(unit_cost, item.annual_units) else {
            continue;
        };

        if best.is_none_or(|(_, _, best_annual)| annual_cost < best_annual) {
            best = Some((country, unit_cost, annual_cost));
        }
    }

    let (country, unit_cost, annual_cost) = best?;

    if annual_cost >= result.scenario_annual_cost {
        trace!(sku = %item.sku, "no cheaper supplier country");

        return None;
    }

    Some(Recommendation {
        item_index: result.item_index,
        sku: item.sku.clone(),
        current_country: item.supplier_country.clone(),
        suggested_country: country.clone(),
        current_unit_cost: result.scenario_unit_cost,
        suggested_unit_cost: unit_cost,
        current_annual_cost: result.scenario_annual_cost,
        projected_annual_cost: annual_cost,
        projected_savings: result.scenario_annual_cost - annual_cost,
    })
}

/// Recommend alternatives for every costed item.
///
/// Each result is matched to its item through [`CostResult::item_index`]; results that point
/// outside `items` are skipped.
pub fn recommend_all(
    items: &[Item],
    results: &[CostResult],
    config: &ScenarioConfig,
) -> Vec<Recommendation> {
    results
        .iter()
        .filter_map(|result| {
            let item = items.get(result.item_index)?;

            recommend(item, result, config)
        })
        .collect()
}

/// The `n` recommendations with the largest projected savings, ties broken by SKU ascending.
pub fn top_savings(recommendations: &[Recommendation], n: usize) -> Vec<&Recommendation> {
    let mut ranked: Vec<&Recommendation> = recommendations.iter().collect();

    ranked.sort_by(|a, b| {
        b.projected_savings
            .cmp(&a.projected_savings)
            .then_with(|| a.sku.cmp(&b.sku))
    });
    ranked.truncate(n);

    ranked
}
