//! Tariffs
//!
//! Tariff tables and the scenario configuration handed to the engine.

use std::collections::{BTreeMap, btree_map};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use thiserror::Error;

use crate::items::Country;

/// Errors raised while building a scenario configuration.
#[derive(Debug, Error, PartialEq)]
pub enum TariffError {
    /// A tariff rate below zero was supplied for a country.
    #[error("tariff rate for {0} is negative: {1}")]
    NegativeRate(Country, Decimal),

    /// The FX multiplier must be strictly positive.
    #[error("FX multiplier must be greater than zero, got {0}")]
    InvalidFxMultiplier(Decimal),
}

/// Tariff rates keyed by supplier country.
///
/// Rates are fractions (`0.10` is 10%). The keys are the universe of known countries
/// considered when recommending an alternate source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TariffTable {
    rates: BTreeMap<Country, Decimal>,
}

impl TariffTable {
    /// Create an empty tariff table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tariff rates for common manufacturing countries.
    pub fn common_manufacturing() -> Self {
        let rates = [
            ("China", dec!(0.20)),
            ("Vietnam", dec!(0.08)),
            ("India", dec!(0.10)),
            ("Mexico", dec!(0.05)),
            ("USA", dec!(0.00)),
            ("Thailand", dec!(0.06)),
            ("Malaysia", dec!(0.05)),
            ("Indonesia", dec!(0.07)),
            ("Taiwan", dec!(0.04)),
        ];

        Self {
            rates: rates
                .into_iter()
                .map(|(country, rate)| (Country::from(country), rate))
                .collect(),
        }
    }

    /// Build a table from `(country, rate)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::NegativeRate`] if any rate is below zero.
    pub fn from_rates<C>(rates: impl IntoIterator<Item = (C, Decimal)>) -> Result<Self, TariffError>
    where
        C: Into<Country>,
    {
        let mut table = Self::new();

        for (country, rate) in rates {
            table.insert(country, rate)?;
        }

        Ok(table)
    }

    /// Set the rate for a country, returning the rate it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::NegativeRate`] if `rate` is below zero.
    pub fn insert(
        &mut self,
        country: impl Into<Country>,
        rate: Decimal,
    ) -> Result<Option<Decimal>, TariffError> {
        let country = country.into();

        if rate < Decimal::ZERO {
            return Err(TariffError::NegativeRate(country, rate));
        }

        Ok(self.rates.insert(country, rate))
    }

    /// Tariff rate for a country, if it is known.
    pub fn rate(&self, country: &str) -> Option<Decimal> {
        self.rates.get(country).copied()
    }

    /// Whether a country has a rate.
    pub fn contains(&self, country: &str) -> bool {
        self.rates.contains_key(country)
    }

    /// Known countries and their rates, in alphabetical country order.
    pub fn iter(&self) -> btree_map::Iter<'_, Country, Decimal> {
        self.rates.iter()
    }

    /// Number of known countries
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the table has no countries.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<'a> IntoIterator for &'a TariffTable {
    type Item = (&'a Country, &'a Decimal);
    type IntoIter = btree_map::Iter<'a, Country, Decimal>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// What to do with an item whose supplier country has no tariff rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnratedPolicy {
    /// Fail the item with an unknown-country error.
    #[default]
    Reject,

    /// Apply a zero rate and flag the item as unrated.
    ZeroRate,
}

/// Tariff rate resolved for a single country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedRate {
    /// Rate used in the calculation
    pub rate: Decimal,

    /// Set when the country was missing from the table and the zero-rate fallback was used.
    pub unrated: bool,
}

/// Immutable inputs for one scenario pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    rates: TariffTable,
    fx_multiplier: Decimal,
    unrated_policy: UnratedPolicy,
}

impl ScenarioConfig {
    /// Create a scenario from a tariff table and a global FX multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::InvalidFxMultiplier`] if `fx_multiplier` is not greater than zero.
    pub fn new(rates: TariffTable, fx_multiplier: Decimal) -> Result<Self, TariffError> {
        if fx_multiplier <= Decimal::ZERO {
            return Err(TariffError::InvalidFxMultiplier(fx_multiplier));
        }

        Ok(Self {
            rates,
            fx_multiplier,
            unrated_policy: UnratedPolicy::default(),
        })
    }

    /// Set the policy for countries missing from the tariff table.
    #[must_use]
    pub fn with_unrated_policy(mut self, policy: UnratedPolicy) -> Self {
        self.unrated_policy = policy;
        self
    }

    /// Tariff table
    pub fn rates(&self) -> &TariffTable {
        &self.rates
    }

    /// Global FX multiplier (`1.0` is no currency movement).
    pub fn fx_multiplier(&self) -> Decimal {
        self.fx_multiplier
    }

    /// Policy for unrated countries
    pub fn unrated_policy(&self) -> UnratedPolicy {
        self.unrated_policy
    }

    /// Resolve the rate for a country under the unrated policy.
    ///
    /// Returns `None` only when the country is unknown and the policy is [`UnratedPolicy::Reject`].
    pub fn resolve(&self, country: &Country) -> Option<AppliedRate> {
        match (self.rates.rate(country.as_str()), self.unrated_policy) {
            (Some(rate), _) => Some(AppliedRate {
                rate,
                unrated: false,
            }),
            (None, UnratedPolicy::ZeroRate) => Some(AppliedRate {
                rate: Decimal::ZERO,
                unrated: true,
            }),
            (None, UnratedPolicy::Reject) => None,
        }
    }
}
