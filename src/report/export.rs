//! CSV export of per-item scenario results.

use std::io;

use rust_decimal::Decimal;

use crate::{items::Item, report::ReportError, scenario::ScenarioReport};

const HEADER: [&str; 16] = [
    "sku",
    "product_name",
    "supplier_country",
    "hs_code",
    "annual_units",
    "base_cost",
    "tariff_rate",
    "unrated",
    "baseline_annual_cost",
    "scenario_unit_cost",
    "scenario_annual_cost",
    "delta",
    "alt_country",
    "alt_unit_cost",
    "savings_per_unit",
    "annual_savings",
];

impl ScenarioReport {
    /// Writes one CSV row per costed item, with its recommendation when there is one.
    ///
    /// Rejected items are not exported.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be written.
    pub fn write_csv(&self, out: impl io::Write, items: &[Item]) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_writer(out);

        writer.write_record(HEADER)?;

        for result in &self.results {
            let Some(item) = items.get(result.item_index) else {
                continue;
            };
            let recommendation = self.recommendation_for(result.item_index);

            writer.write_record([
                item.sku.clone(),
                item.product_name.clone(),
                item.supplier_country.to_string(),
                item.hs_code.clone(),
                item.annual_units.to_string(),
                amount(item.base_cost),
                amount(result.tariff_rate),
                result.unrated.to_string(),
                amount(result.baseline_annual_cost),
                amount(result.scenario_unit_cost),
                amount(result.scenario_annual_cost),
                amount(result.delta),
                recommendation
                    .map(|r| r.suggested_country.to_string())
                    .unwrap_or_default(),
                recommendation
                    .map(|r| amount(r.suggested_unit_cost))
                    .unwrap_or_default(),
                recommendation
                    .map(|r| amount(r.savings_per_unit()))
                    .unwrap_or_default(),
                recommendation
                    .map(|r| amount(r.projected_savings))
                    .unwrap_or_default(),
            ])?;
        }

        writer.flush()?;

        Ok(())
    }
}

fn amount(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        aggregation::DEFAULT_TOP_N,
        scenario::evaluate,
        tariffs::{ScenarioConfig, TariffTable},
    };

    use super::*;

    #[test]
    fn write_csv_exports_costs_and_recommendation() -> TestResult {
        let rates = TariffTable::from_rates([("CN", dec!(0.25)), ("VN", dec!(0.05))])?;
        let config = ScenarioConfig::new(rates, dec!(1.1))?;
        let items = [
            Item::new("A1", dec!(10.0), "CN", 100)
                .with_product_name("Widget A")
                .with_hs_code("850440"),
            Item::new("A2", dec!(2), "VN", 10),
            Item::new("BAD", dec!(2), "Atlantis", 10),
        ];
        let report = evaluate(&items, &config, DEFAULT_TOP_N);
        let mut out = Vec::new();

        report.write_csv(&mut out, &items)?;

        let csv = String::from_utf8(out)?;
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3, "header plus two costed items");
        assert_eq!(lines.first().copied(), Some(HEADER.join(",").as_str()));
        assert_eq!(
            lines.get(1).copied(),
            Some("A1,Widget A,CN,850440,100,10,0.25,false,1000,13.75,1375,375,VN,11.55,2.2,220")
        );
        assert_eq!(
            lines.get(2).copied(),
            Some("A2,,VN,,10,2,0.05,false,20,2.31,23.1,3.1,,,,")
        );

        Ok(())
    }
}
