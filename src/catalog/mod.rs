//! Product catalog: device tiers and the upgrade chain

mod tier;
pub mod loader;

pub use tier::{ProductCatalog, ProductTier, TierQuote, UpgradeQuote, Yen};
pub use loader::{load_catalog, load_catalog_from_reader, load_default_catalog, DEFAULT_CATALOG_PATH};
