//! Load a product catalog from CSV
//!
//! Expected columns (header row required):
//! id,name,price,monthly_rental,resale_value,resale_percentage,max_profit,rental_months,limit,next_tier,description
//!
//! An empty `next_tier` marks the last tier of the chain.

use super::{ProductCatalog, ProductTier};
use crate::error::Result;
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default catalog location, relative to the working directory
pub const DEFAULT_CATALOG_PATH: &str = "data/tiers.csv";

/// Load and validate a catalog from a CSV file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ProductCatalog> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let catalog = load_catalog_from_reader(file)?;
    info!("Loaded {} tiers from {}", catalog.tiers().len(), path.display());
    Ok(catalog)
}

/// Load and validate a catalog from any CSV reader
pub fn load_catalog_from_reader<R: Read>(reader: R) -> Result<ProductCatalog> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut tiers = Vec::new();
    for row in rdr.deserialize() {
        let tier: ProductTier = row?;
        tiers.push(tier);
    }

    ProductCatalog::from_loaded(tiers)
}

/// Use the CSV at [`DEFAULT_CATALOG_PATH`] when present, otherwise the built-in tiers
pub fn load_default_catalog() -> Result<ProductCatalog> {
    if Path::new(DEFAULT_CATALOG_PATH).exists() {
        load_catalog(DEFAULT_CATALOG_PATH)
    } else {
        Ok(ProductCatalog::default())
    }
}

impl ProductCatalog {
    /// Create from loaded CSV rows
    pub fn from_loaded(tiers: Vec<ProductTier>) -> Result<Self> {
        Self::new(tiers)
    }
}
