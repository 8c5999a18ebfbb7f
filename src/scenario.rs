//! Scenario
//!
//! One costing pass: baseline and scenario costing, then aggregation and recommendation.
//! A pass holds no state between calls and performs no I/O.

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::{
    aggregation::{Summary, summarize},
    items::Item,
    pricing::{CostError, CostResult, baseline_annual_cost, scenario_cost},
    recommendations::{Recommendation, recommend_all, top_savings},
    tariffs::ScenarioConfig,
};

/// An item excluded from a pass, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position of the rejected item in the input slice
    pub item_index: usize,

    /// Why the item was rejected
    pub error: CostError,
}

/// Everything produced by one scenario pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioReport {
    /// One result per accepted item, in input order
    pub results: Vec<CostResult>,

    /// Items that could not be costed, in input order
    pub rejected: Vec<Rejection>,

    /// Totals, top increases and spend share over the accepted items
    pub summary: Summary,

    /// Alternate supplier suggestions, in input order
    pub recommendations: Vec<Recommendation>,
}

impl ScenarioReport {
    /// Recommendations with the largest projected savings first.
    pub fn top_savings(&self, n: usize) -> Vec<&Recommendation> {
        top_savings(&self.recommendations, n)
    }

    /// Cost result for an input item, if it was accepted.
    pub fn result_for(&self, item_index: usize) -> Option<&CostResult> {
        self.results.iter().find(|r| r.item_index == item_index)
    }

    /// Recommendation for an input item, if one was made.
    pub fn recommendation_for(&self, item_index: usize) -> Option<&Recommendation> {
        self.recommendations
            .iter()
            .find(|r| r.item_index == item_index)
    }
}

/// Baseline annual cost for each item, in input order.
pub fn baseline_costs(items: &[Item]) -> Vec<Result<Decimal, CostError>> {
    items.iter().map(baseline_annual_cost).collect()
}

/// Cost every item under a scenario, splitting accepted results from rejections.
pub fn scenario_costs(items: &[Item], config: &ScenarioConfig) -> (Vec<CostResult>, Vec<Rejection>) {
    let mut results = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();

    for (item_index, item) in items.iter().enumerate() {
        match scenario_cost(item_index, item, config) {
            Ok(result) => results.push(result),
            Err(error) => {
                warn!(item_index, %error, "item rejected from scenario");

                rejected.push(Rejection { item_index, error });
            }
        }
    }

    (results, rejected)
}

/// Run a full scenario pass over a set of items.
///
/// Rejected items are reported in [`ScenarioReport::rejected`] and left out of every
/// aggregate and recommendation; the remaining items are still analysed.
#[instrument(skip_all, fields(items = items.len(), countries = config.rates().len(), fx = %config.fx_multiplier()))]
pub fn evaluate(items: &[Item], config: &ScenarioConfig, top_n: usize) -> ScenarioReport {
    let (results, rejected) = scenario_costs(items, config);
    let summary = summarize(&results, top_n);
    let recommendations = recommend_all(items, &results, config);

    debug!(
        accepted = results.len(),
        rejected = rejected.len(),
        recommendations = recommendations.len(),
        "scenario evaluated"
    );

    ScenarioReport {
        results,
        rejected,
        summary,
        recommendations,
    }
}
