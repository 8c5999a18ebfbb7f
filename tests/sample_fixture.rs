//! End-to-end runs over the bundled fixture sets.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use testresult::TestResult;

use tariffscope::{fixtures::Fixture, prelude::*};

#[test]
fn sample_set_costs_every_item() -> TestResult {
    let fixture = Fixture::from_set("sample")?;
    let report = fixture.evaluate(DEFAULT_TOP_N)?;

    assert_eq!(report.results.len(), 12);
    assert!(report.rejected.is_empty(), "every sample country is rated");

    let widget = report
        .results
        .iter()
        .find(|r| r.sku == "SKU-001")
        .map(|r| (r.tariff_rate, r.scenario_unit_cost, r.scenario_annual_cost, r.delta));

    assert_eq!(
        widget,
        Some((dec!(0.35), dec!(17.38125), dec!(347625), dec!(97625)))
    );

    Ok(())
}

#[test]
fn sample_set_overrides_preset_rates() -> TestResult {
    let fixture = Fixture::from_set("sample")?;
    let rates = fixture.scenario()?.rates();

    assert_eq!(rates.rate("China"), Some(dec!(0.35)));
    assert_eq!(rates.rate("Mexico"), Some(Decimal::ZERO));
    assert_eq!(rates.rate("Taiwan"), Some(dec!(0.04)));

    Ok(())
}

#[test]
fn sample_set_prefers_mexico_over_equally_cheap_usa() -> TestResult {
    let fixture = Fixture::from_set("sample")?;
    let report = fixture.evaluate(DEFAULT_TOP_N)?;

    assert_eq!(report.recommendations.len(), 10);
    assert!(
        report
            .recommendations
            .iter()
            .all(|r| r.suggested_country.as_str() == "Mexico"),
        "alphabetical tie-break should pick Mexico"
    );

    for zero_rated in ["SKU-004", "SKU-010"] {
        assert!(
            report.recommendations.iter().all(|r| r.sku != zero_rated),
            "{zero_rated} is already at the cheapest rate"
        );
    }

    let widget = report
        .recommendations
        .iter()
        .find(|r| r.sku == "SKU-001")
        .map(|r| (r.suggested_unit_cost, r.projected_savings));

    assert_eq!(widget, Some((dec!(12.875), dec!(90125))));

    Ok(())
}

#[test]
fn sample_set_totals_match_results() -> TestResult {
    let fixture = Fixture::from_set("sample")?;
    let report = fixture.evaluate(3)?;
    let totals = report.summary.totals;

    let baseline: Decimal = report.results.iter().map(|r| r.baseline_annual_cost).sum();
    let scenario: Decimal = report.results.iter().map(|r| r.scenario_annual_cost).sum();

    assert_eq!(totals.items, 12);
    assert_eq!(totals.baseline, baseline);
    assert_eq!(totals.scenario, scenario);
    assert!(totals.delta > Decimal::ZERO, "sample scenario raises costs");
    assert_eq!(report.summary.top_increases.len(), 3);
    assert_eq!(
        report.summary.top_increases.first().map(|r| r.sku.as_str()),
        Some("SKU-001")
    );

    Ok(())
}

#[test]
fn sample_set_renders_and_exports() -> TestResult {
    let fixture = Fixture::from_set("sample")?;
    let report = fixture.evaluate(DEFAULT_TOP_N)?;

    let mut rendered = Vec::new();
    report.write_to(&mut rendered, fixture.items(), fixture.currency(), DEFAULT_TOP_N)?;
    let rendered = String::from_utf8(rendered)?;

    assert!(rendered.contains("SKU-001"));
    assert!(rendered.contains("Mexico"));
    assert!(rendered.contains("Country spend share"));

    let mut exported = Vec::new();
    report.write_csv(&mut exported, fixture.items())?;
    let exported = String::from_utf8(exported)?;

    assert_eq!(exported.lines().count(), 13, "header plus one row per item");

    Ok(())
}

#[test]
fn baseline_set_reproduces_current_costs() -> TestResult {
    let fixture = Fixture::from_set("baseline")?;
    let report = fixture.evaluate(DEFAULT_TOP_N)?;

    assert_eq!(report.results.len(), 12);
    assert!(report.results.iter().all(|r| r.unrated), "no rates configured");
    assert!(report.summary.totals.delta.is_zero());
    assert!(report.recommendations.is_empty());

    Ok(())
}
