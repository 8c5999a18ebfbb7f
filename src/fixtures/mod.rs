//! Fixtures
//!
//! Loads a scenario file and an item dataset from disk. A fixture set `name` is the pair
//! `scenarios/<name>.yml` and `items/<name>.csv` under the base path.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::{Currency, USD};
use thiserror::Error;
use tracing::debug;

use crate::{
    dataset::{Dataset, DatasetError},
    fixtures::scenarios::ScenarioFixture,
    items::Item,
    scenario::{ScenarioReport, evaluate},
    tariffs::{ScenarioConfig, TariffError},
};

pub mod scenarios;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid FX multiplier format
    #[error("Invalid multiplier format: {0}")]
    InvalidMultiplier(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unknown tariff preset
    #[error("Unknown tariff preset: {0}")]
    UnknownPreset(String),

    /// Scenario values rejected by the tariff table or configuration
    #[error("Invalid scenario: {0}")]
    Tariff(#[from] TariffError),

    /// Dataset could not be loaded
    #[error("Failed to load dataset: {0}")]
    Dataset(#[from] DatasetError),

    /// No scenario loaded yet
    #[error("No scenario loaded")]
    NoScenario,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Scenario configuration, once loaded
    scenario: Option<ScenarioConfig>,

    /// Display currency for the scenario
    currency: &'static Currency,

    /// Loaded items and skipped rows
    dataset: Dataset,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            scenario: None,
            currency: USD,
            dataset: Dataset::default(),
        }
    }

    /// Load a scenario by name from the `scenarios` directory
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its values are invalid.
    pub fn load_scenario(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("scenarios")
            .join(format!("{name}.yml"));

        self.load_scenario_file(file_path)
    }

    /// Load a scenario from an explicit YAML file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its values are invalid.
    pub fn load_scenario_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, FixtureError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let fixture: ScenarioFixture = serde_norway::from_str(&contents)?;

        self.currency = fixture.currency()?;
        self.scenario = Some(fixture.to_config()?);

        debug!(path = %path.as_ref().display(), "scenario loaded");

        Ok(self)
    }

    /// Load items by name from the `items` directory
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be read or is missing required columns.
    pub fn load_items(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("items").join(format!("{name}.csv"));

        self.load_items_file(file_path)
    }

    /// Load items from an explicit CSV file path, replacing any loaded items
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be read or is missing required columns.
    pub fn load_items_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, FixtureError> {
        self.dataset = Dataset::from_path(path)?;

        Ok(self)
    }

    /// Load a complete fixture set (scenario and items with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_scenario(name)?.load_items(name)?;

        Ok(fixture)
    }

    /// Replace the scenario configuration
    pub fn set_scenario(&mut self, scenario: ScenarioConfig) -> &mut Self {
        self.scenario = Some(scenario);
        self
    }

    /// Get the scenario configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no scenario has been loaded yet.
    pub fn scenario(&self) -> Result<&ScenarioConfig, FixtureError> {
        self.scenario.as_ref().ok_or(FixtureError::NoScenario)
    }

    /// Get the loaded dataset
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Get all items
    pub fn items(&self) -> &[Item] {
        &self.dataset.items
    }

    /// Get the display currency
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Run the loaded scenario over the loaded items
    ///
    /// # Errors
    ///
    /// Returns an error if no scenario has been loaded yet.
    pub fn evaluate(&self, top_n: usize) -> Result<ScenarioReport, FixtureError> {
        Ok(evaluate(self.items(), self.scenario()?, top_n))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
