//! Tariffscope prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    aggregation::{DEFAULT_TOP_N, SpendShare, Summary, Totals},
    dataset::{Dataset, DatasetError, RowError},
    fixtures::{Fixture, FixtureError},
    items::{Country, Item, ItemField},
    pricing::{CostError, CostResult},
    recommendations::Recommendation,
    report::ReportError,
    scenario::{Rejection, ScenarioReport, evaluate},
    tariffs::{AppliedRate, ScenarioConfig, TariffError, TariffTable, UnratedPolicy},
};
