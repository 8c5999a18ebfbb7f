//! Scenario Fixtures

use rust_decimal::{Decimal, prelude::FromPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    tariffs::{ScenarioConfig, TariffTable, UnratedPolicy},
};

/// Scenario definition in YAML
#[derive(Debug, Deserialize)]
pub struct ScenarioFixture {
    /// ISO currency code used for display (e.g., "USD")
    #[serde(default)]
    pub currency: Option<String>,

    /// Global FX multiplier, defaults to 1
    #[serde(default)]
    pub fx_multiplier: Option<NumberValue>,

    /// Policy for supplier countries missing from the rates
    #[serde(default)]
    pub unrated_policy: UnratedPolicy,

    /// Named base tariff table the rates are layered over
    #[serde(default)]
    pub preset: Option<String>,

    /// Map of country -> tariff rate ("25%" or 0.25)
    #[serde(default)]
    pub rates: FxHashMap<String, NumberValue>,
}

/// A number written either as a YAML number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberValue {
    /// Plain YAML number
    Number(f64),

    /// Quoted or suffixed value, e.g. "25%"
    Text(String),
}

impl ScenarioFixture {
    /// Currency for the scenario, USD when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency code is not recognized.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.as_deref().map_or(Ok(USD), parse_currency)
    }

    /// Build the scenario configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the preset is unknown, a rate or multiplier cannot be parsed,
    /// or the resulting configuration is invalid.
    pub fn to_config(&self) -> Result<ScenarioConfig, FixtureError> {
        let mut rates = match self.preset.as_deref() {
            None => TariffTable::new(),
            Some(name) => preset(name)?,
        };

        for (country, rate) in &self.rates {
            rates.insert(country.as_str(), parse_percentage(rate)?)?;
        }

        let fx_multiplier = self
            .fx_multiplier
            .as_ref()
            .map_or(Ok(Decimal::ONE), parse_multiplier)?;

        Ok(ScenarioConfig::new(rates, fx_multiplier)?.with_unrated_policy(self.unrated_policy))
    }
}

/// Look up a named tariff table.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownPreset`] for unrecognized names.
pub fn preset(name: &str) -> Result<TariffTable, FixtureError> {
    match name {
        "common_manufacturing" => Ok(TariffTable::common_manufacturing()),
        "none" => Ok(TariffTable::new()),
        other => Err(FixtureError::UnknownPreset(other.to_string())),
    }
}

/// Parse a currency code
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for unsupported codes.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a rate (e.g., "15%", "0.15" or 0.15) into a fraction
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the value cannot be parsed.
pub fn parse_percentage(value: &NumberValue) -> Result<Decimal, FixtureError> {
    let invalid = || FixtureError::InvalidPercentage(display(value));

    match value {
        NumberValue::Number(n) => Decimal::from_f64(*n).ok_or_else(invalid),
        NumberValue::Text(s) => {
            let trimmed = s.trim();

            if let Some(percent_str) = trimmed.strip_suffix('%') {
                let points = percent_str
                    .trim()
                    .parse::<Decimal>()
                    .map_err(|_err| invalid())?;

                points.checked_div(Decimal::ONE_HUNDRED).ok_or_else(invalid)
            } else {
                trimmed.parse::<Decimal>().map_err(|_err| invalid())
            }
        }
    }
}

/// Parse a plain multiplier (e.g., "1.05" or 1.05)
///
/// # Errors
///
/// Returns [`FixtureError::InvalidMultiplier`] if the value is not a number.
pub fn parse_multiplier(value: &NumberValue) -> Result<Decimal, FixtureError> {
    let parsed = match value {
        NumberValue::Number(n) => Decimal::from_f64(*n),
        NumberValue::Text(s) => s.trim().parse::<Decimal>().ok(),
    };

    parsed.ok_or_else(|| FixtureError::InvalidMultiplier(display(value)))
}

fn display(value: &NumberValue) -> String {
    match value {
        NumberValue::Number(n) => n.to_string(),
        NumberValue::Text(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::tariffs::TariffError;

    use super::*;

    fn fixture(yaml: &str) -> Result<ScenarioFixture, serde_norway::Error> {
        serde_norway::from_str(yaml)
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(
            parse_percentage(&NumberValue::Text("15%".to_string()))?,
            dec!(0.15)
        );
        assert_eq!(
            parse_percentage(&NumberValue::Text(" 0.15 ".to_string()))?,
            dec!(0.15)
        );
        assert_eq!(parse_percentage(&NumberValue::Number(0.08))?, dec!(0.08));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_garbage() {
        let result = parse_percentage(&NumberValue::Text("lots".to_string()));

        assert!(matches!(result, Err(FixtureError::InvalidPercentage(v)) if v == "lots"));
    }

    #[test]
    fn parse_currency_rejects_unknown_code() {
        assert!(matches!(
            parse_currency("ABC"),
            Err(FixtureError::UnknownCurrency(code)) if code == "ABC"
        ));
    }

    #[test]
    fn defaults_to_usd_and_unit_fx() -> TestResult {
        let fixture = fixture("rates:\n  China: 25%\n")?;
        let config = fixture.to_config()?;

        assert_eq!(fixture.currency()?, USD);
        assert_eq!(config.fx_multiplier(), Decimal::ONE);
        assert_eq!(config.unrated_policy(), UnratedPolicy::Reject);
        assert_eq!(config.rates().rate("China"), Some(dec!(0.25)));

        Ok(())
    }

    #[test]
    fn rates_override_preset() -> TestResult {
        let yaml = "\
currency: GBP
fx_multiplier: \"1.05\"
unrated_policy: zero_rate
preset: common_manufacturing
rates:
  China: 0.3
  Brazil: 12%
";
        let fixture = fixture(yaml)?;
        let config = fixture.to_config()?;

        assert_eq!(fixture.currency()?, GBP);
        assert_eq!(config.fx_multiplier(), dec!(1.05));
        assert_eq!(config.unrated_policy(), UnratedPolicy::ZeroRate);
        assert_eq!(config.rates().rate("China"), Some(dec!(0.3)));
        assert_eq!(config.rates().rate("Brazil"), Some(dec!(0.12)));
        assert_eq!(config.rates().rate("Vietnam"), Some(dec!(0.08)));
        assert_eq!(config.rates().len(), 10);

        Ok(())
    }

    #[test]
    fn unknown_preset_is_rejected() -> TestResult {
        let fixture = fixture("preset: imaginary\n")?;

        assert!(matches!(
            fixture.to_config(),
            Err(FixtureError::UnknownPreset(name)) if name == "imaginary"
        ));

        Ok(())
    }

    #[test]
    fn invalid_values_surface_tariff_errors() -> TestResult {
        let negative = fixture("rates:\n  China: -5%\n")?;
        let zero_fx = fixture("fx_multiplier: 0\n")?;

        assert!(matches!(
            negative.to_config(),
            Err(FixtureError::Tariff(TariffError::NegativeRate(..)))
        ));
        assert!(matches!(
            zero_fx.to_config(),
            Err(FixtureError::Tariff(TariffError::InvalidFxMultiplier(_)))
        ));

        Ok(())
    }
}
