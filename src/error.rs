//! Error types shared across the catalog, plan and projection modules

use thiserror::Error;

/// Errors produced while loading inputs or running a projection
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Tier identifier not present in the catalog
    #[error("unknown tier: {0}")]
    UnknownTier(String),

    /// Quantity outside the accepted range
    #[error("invalid quantity {quantity}: must be between {min} and {max}")]
    InvalidQuantity { quantity: u32, min: u32, max: u32 },

    /// Horizon longer than the engine accepts
    #[error("invalid horizon {months}: must be at most {max} months")]
    InvalidHorizon { months: u32, max: u32 },

    /// Upgrade decision recorded without a destination tier
    #[error("upgrade decision at month {month} has no destination tier")]
    MissingUpgradeTarget { month: u32 },

    /// Upgrade requested for the last tier in the chain
    #[error("tier {0} has no successor to upgrade to")]
    NoSuccessor(String),

    /// No decision point left inside the horizon
    #[error("next decision month {month} is past the {horizon}-month horizon")]
    DecisionNotDue { month: u32, horizon: u32 },

    /// A decision already occupies this month
    #[error("a decision is already recorded for month {0}")]
    DecisionAlreadyRecorded(u32),

    /// Catalog breaks the single-chain invariant
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Month arithmetic left the representable date range
    #[error("date out of range: {start} + {months} months")]
    InvalidDate { start: chrono::NaiveDate, months: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
