//! Items

use std::{borrow::Borrow, fmt};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supplier country, used as the key into a tariff table.
///
/// Countries compare by name, so ordered collections of countries are alphabetical.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(String);

impl Country {
    /// Create a country from its display name, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_string())
    }

    /// Country name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Country {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Country {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl Borrow<str> for Country {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Dataset columns, in their canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    /// `sku`
    Sku,
    /// `product_name`
    ProductName,
    /// `base_cost`
    BaseCost,
    /// `supplier_country`
    SupplierCountry,
    /// `hs_code`
    HsCode,
    /// `annual_units`
    AnnualUnits,
}

impl ItemField {
    /// Every column a dataset must provide.
    pub const ALL: [ItemField; 6] = [
        ItemField::Sku,
        ItemField::ProductName,
        ItemField::BaseCost,
        ItemField::SupplierCountry,
        ItemField::HsCode,
        ItemField::AnnualUnits,
    ];

    /// Column name
    pub fn column(self) -> &'static str {
        match self {
            ItemField::Sku => "sku",
            ItemField::ProductName => "product_name",
            ItemField::BaseCost => "base_cost",
            ItemField::SupplierCountry => "supplier_country",
            ItemField::HsCode => "hs_code",
            ItemField::AnnualUnits => "annual_units",
        }
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A purchased item, one row of the uploaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Stock-keeping unit. Duplicates are processed independently.
    pub sku: String,

    /// Display label
    pub product_name: String,

    /// Unit cost in the reference currency, before tariff and FX.
    pub base_cost: Decimal,

    /// Country the item is currently sourced from
    pub supplier_country: Country,

    /// Harmonized System classification, carried through untouched.
    pub hs_code: String,

    /// Units purchased per year
    pub annual_units: i64,
}

impl Item {
    /// Create a new item with an empty product name and HS code.
    pub fn new(
        sku: impl Into<String>,
        base_cost: Decimal,
        supplier_country: impl Into<Country>,
        annual_units: i64,
    ) -> Self {
        Self {
            sku: sku.into(),
            product_name: String::new(),
            base_cost,
            supplier_country: supplier_country.into(),
            hs_code: String::new(),
            annual_units,
        }
    }

    /// Set the display label
    #[must_use]
    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = product_name.into();
        self
    }

    /// Set the HS classification code
    #[must_use]
    pub fn with_hs_code(mut self, hs_code: impl Into<String>) -> Self {
        self.hs_code = hs_code.into();
        self
    }
}
