//! Tariffscope
//!
//! Tariffscope is a what-if costing engine for purchased SKU catalogs. It applies per-country
//! tariff rates and a global FX multiplier to an item list, compares the landed annual cost
//! against a tariff-free baseline and suggests cheaper supplier countries.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tariffscope::prelude::*;
//!
//! # fn main() -> Result<(), TariffError> {
//! let rates = TariffTable::from_rates([("CN", dec!(0.25)), ("VN", dec!(0.05))])?;
//! let config = ScenarioConfig::new(rates, dec!(1.1))?;
//! let items = [Item::new("A1", dec!(10.0), "CN", 100)];
//!
//! let report = evaluate(&items, &config, DEFAULT_TOP_N);
//!
//! assert_eq!(report.summary.totals.scenario, dec!(1375.0));
//! assert_eq!(report.recommendations[0].projected_savings, dec!(220.0));
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod dataset;
pub mod fixtures;
pub mod items;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod recommendations;
pub mod report;
pub mod scenario;
pub mod tariffs;
pub mod utils;
