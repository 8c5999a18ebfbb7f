//! Pricing
//!
//! Baseline and scenario costing for individual items.
//!
//! Scenario unit cost is always built in the same order: base cost, then tariff, then FX.
//! Annual cost is the unit cost multiplied by annual units.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    items::{Country, Item, ItemField},
    tariffs::ScenarioConfig,
};

/// Errors that reject a single item from a costing pass.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CostError {
    /// A numeric field holds a value the engine cannot cost.
    #[error("item {sku}: {field} {reason}")]
    InvalidInput {
        /// SKU of the rejected item
        sku: String,

        /// Offending field
        field: ItemField,

        /// Human readable reason
        reason: String,
    },

    /// The supplier country is missing from the tariff table.
    #[error("item {sku}: supplier country {country} has no tariff rate")]
    UnknownCountry {
        /// SKU of the rejected item
        sku: String,

        /// Country that could not be resolved
        country: Country,
    },

    /// Cost arithmetic exceeded the representable range.
    #[error("item {sku}: cost calculation overflowed")]
    Overflow {
        /// SKU of the rejected item
        sku: String,
    },
}

impl CostError {
    /// SKU of the item the error belongs to.
    pub fn sku(&self) -> &str {
        match self {
            CostError::InvalidInput { sku, .. }
            | CostError::UnknownCountry { sku, .. }
            | CostError::Overflow { sku } => sku,
        }
    }
}

/// Baseline and scenario costs for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct CostResult {
    /// Position of the source item in the input slice
    pub item_index: usize,

    /// SKU of the source item
    pub sku: String,

    /// Supplier country of the source item
    pub supplier_country: Country,

    /// Tariff rate applied to the item
    pub tariff_rate: Decimal,

    /// Set when the country had no rate and the zero-rate fallback applied.
    pub unrated: bool,

    /// `base_cost × annual_units`
    pub baseline_annual_cost: Decimal,

    /// `base_cost × (1 + tariff_rate) × fx_multiplier`
    pub scenario_unit_cost: Decimal,

    /// `scenario_unit_cost × annual_units`
    pub scenario_annual_cost: Decimal,

    /// `scenario_annual_cost − baseline_annual_cost`
    pub delta: Decimal,
}

/// Check that an item's numeric fields can be costed.
///
/// # Errors
///
/// Returns [`CostError::InvalidInput`] if `base_cost` or `annual_units` is negative.
pub fn validate(item: &Item) -> Result<(), CostError> {
    if item.base_cost < Decimal::ZERO {
        return Err(invalid(item, ItemField::BaseCost, item.base_cost));
    }

    if item.annual_units < 0 {
        return Err(invalid(item, ItemField::AnnualUnits, item.annual_units));
    }

    Ok(())
}

fn invalid(item: &Item, field: ItemField, value: impl std::fmt::Display) -> CostError {
    CostError::InvalidInput {
        sku: item.sku.clone(),
        field,
        reason: format!("must not be negative, got {value}"),
    }
}

/// Annual cost with no tariff and no currency movement.
///
/// # Errors
///
/// - [`CostError::InvalidInput`]: `base_cost` or `annual_units` is negative.
/// - [`CostError::Overflow`]: the annual cost cannot be represented.
pub fn baseline_annual_cost(item: &Item) -> Result<Decimal, CostError> {
    validate(item)?;

    annualize(item.base_cost, item.annual_units).ok_or_else(|| overflow(item))
}

/// Landed unit cost: `base_cost`, then tariff, then FX.
///
/// Returns `None` on overflow.
pub fn landed_unit_cost(base_cost: Decimal, tariff_rate: Decimal, fx_multiplier: Decimal) -> Option<Decimal> {
    let tariffed = base_cost.checked_mul(Decimal::ONE.checked_add(tariff_rate)?)?;

    tariffed.checked_mul(fx_multiplier)
}

/// Multiply a unit cost by annual units.
///
/// Returns `None` on overflow.
pub fn annualize(unit_cost: Decimal, annual_units: i64) -> Option<Decimal> {
    unit_cost.checked_mul(Decimal::from(annual_units))
}

/// Scenario annual cost for an item if it were sourced at `tariff_rate`.
///
/// Returns `None` on overflow.
pub fn annual_cost_at_rate(item: &Item, tariff_rate: Decimal, fx_multiplier: Decimal) -> Option<Decimal> {
    annualize(
        landed_unit_cost(item.base_cost, tariff_rate, fx_multiplier)?,
        item.annual_units,
    )
}

/// Cost a single item under a scenario.
///
/// # Errors
///
/// - [`CostError::InvalidInput`]: `base_cost` or `annual_units` is negative.
/// - [`CostError::UnknownCountry`]: the supplier country has no rate and the policy rejects it.
/// - [`CostError::Overflow`]: any intermediate cost cannot be represented.
pub fn scenario_cost(
    item_index: usize,
    item: &Item,
    config: &ScenarioConfig,
) -> Result<CostResult, CostError> {
    let baseline_annual_cost = baseline_annual_cost(item)?;

    let applied = config
        .resolve(&item.supplier_country)
        .ok_or_else(|| CostError::UnknownCountry {
            sku: item.sku.clone(),
            country: item.supplier_country.clone(),
        })?;

    let scenario_unit_cost =
        landed_unit_cost(item.base_cost, applied.rate, config.fx_multiplier())
            .ok_or_else(|| overflow(item))?;

    let scenario_annual_cost =
        annualize(scenario_unit_cost, item.annual_units).ok_or_else(|| overflow(item))?;

    let delta = scenario_annual_cost
        .checked_sub(baseline_annual_cost)
        .ok_or_else(|| overflow(item))?;

    Ok(CostResult {
        item_index,
        sku: item.sku.clone(),
        supplier_country: item.supplier_country.clone(),
        tariff_rate: applied.rate,
        unrated: applied.unrated,
        baseline_annual_cost,
        scenario_unit_cost,
        scenario_annual_cost,
        delta,
    })
}

fn overflow(item: &Item) -> CostError {
    CostError::Overflow {
        sku: item.sku.clone(),
    }
}
