//! Dataset
//!
//! CSV ingestion of item rows. Column names are matched case-insensitively. Missing
//! columns abort the load before any row is read; bad rows are collected and skipped.

use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;
use tracing::{debug, warn};

use crate::items::{Country, Item, ItemField};

/// Errors that stop a dataset from loading at all.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// IO error reading the dataset
    #[error("failed to read dataset: {0}")]
    Io(#[from] io::Error),

    /// The CSV stream could not be read
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Required columns are absent from the header row
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A single row that could not be turned into an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: {reason}")]
pub struct RowError {
    /// 1-based data row number, not counting the header
    pub row: usize,

    /// SKU of the row, when it could be read
    pub sku: Option<String>,

    /// Offending column, `None` when the whole record is malformed
    pub field: Option<ItemField>,

    /// Human readable reason
    pub reason: String,
}

/// Items parsed from a dataset, plus the rows that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Successfully parsed items, in file order
    pub items: Vec<Item>,

    /// Rows that were skipped, in file order
    pub row_errors: Vec<RowError>,
}

impl Dataset {
    /// Load a dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read, or if required columns are missing.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = File::open(path)?;

        Self::from_reader(file)
    }

    /// Load a dataset from any CSV source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or if required columns are missing.
    pub fn from_reader(source: impl io::Read) -> Result<Self, DatasetError> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
        let columns = Columns::locate(reader.headers()?)?;

        let mut dataset = Dataset::default();

        for (idx, record) in reader.records().enumerate() {
            let row = idx + 1;

            let parsed = match record {
                Ok(record) => columns.parse(row, &record),
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => Err(RowError {
                    row,
                    sku: None,
                    field: None,
                    reason: err.to_string(),
                }),
            };

            match parsed {
                Ok(item) => dataset.items.push(item),
                Err(error) => {
                    warn!(%error, "skipping dataset row");

                    dataset.row_errors.push(error);
                }
            }
        }

        debug!(
            items = dataset.items.len(),
            skipped = dataset.row_errors.len(),
            "dataset loaded"
        );

        Ok(dataset)
    }

    /// Number of parsed items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were parsed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Column positions of each item field in the header row.
#[derive(Debug)]
struct Columns {
    positions: [(ItemField, usize); 6],
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, DatasetError> {
        let normalized: Vec<String> = headers.iter().map(str::to_lowercase).collect();
        let position = |field: ItemField| normalized.iter().position(|h| h == field.column());

        let missing: Vec<String> = ItemField::ALL
            .into_iter()
            .filter(|field| position(*field).is_none())
            .map(|field| field.column().to_string())
            .collect();

        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns(missing));
        }

        let positions = ItemField::ALL.map(|field| (field, position(field).unwrap_or_default()));

        Ok(Self { positions })
    }

    fn value<'r>(&self, record: &'r StringRecord, field: ItemField) -> &'r str {
        self.positions
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, idx)| record.get(*idx))
            .unwrap_or_default()
    }

    fn parse(&self, row: usize, record: &StringRecord) -> Result<Item, RowError> {
        let sku = self.value(record, ItemField::Sku);
        let error = |field: ItemField, reason: String| RowError {
            row,
            sku: (!sku.is_empty()).then(|| sku.to_string()),
            field: Some(field),
            reason: format!("{field} {reason}"),
        };

        if sku.is_empty() {
            return Err(error(ItemField::Sku, "is empty".to_string()));
        }

        let raw_cost = self.value(record, ItemField::BaseCost);
        let base_cost = raw_cost
            .parse::<Decimal>()
            .map_err(|_err| error(ItemField::BaseCost, format!("is not a number: {raw_cost:?}")))?;

        let country = self.value(record, ItemField::SupplierCountry);
        if country.is_empty() {
            return Err(error(ItemField::SupplierCountry, "is empty".to_string()));
        }

        let raw_units = self.value(record, ItemField::AnnualUnits);
        let annual_units = parse_units(raw_units).ok_or_else(|| {
            error(
                ItemField::AnnualUnits,
                format!("is not a whole number: {raw_units:?}"),
            )
        })?;

        Ok(Item {
            sku: sku.to_string(),
            product_name: self.value(record, ItemField::ProductName).to_string(),
            base_cost,
            supplier_country: Country::new(country),
            hs_code: self.value(record, ItemField::HsCode).to_string(),
            annual_units,
        })
    }
}

/// Parse a unit count, accepting decimal notation with no fractional part (`"1500.0"`).
fn parse_units(raw: &str) -> Option<i64> {
    if let Ok(units) = raw.parse::<i64>() {
        return Some(units);
    }

    let units = raw.parse::<Decimal>().ok()?;

    if units.fract().is_zero() {
        units.to_i64()
    } else {
        None
    }
}
