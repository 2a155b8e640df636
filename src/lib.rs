//! Rental Projection - monthly cash-flow projection for device rental-then-resale plans
//!
//! This library provides:
//! - The product catalog of device tiers and their upgrade chain
//! - A pure month-by-month projection engine over a fixed horizon
//! - Decision recording (upgrade / resale) with full replay on every change
//! - Scenario parameters loadable from JSON and catalogs loadable from CSV

pub mod error;
pub mod catalog;
pub mod plan;
pub mod projection;

// Re-export commonly used types
pub use error::{ProjectionError, Result};
pub use catalog::{ProductCatalog, ProductTier, TierQuote, Yen};
pub use plan::{Decision, DecisionAction, PlanSession, ScenarioParams};
pub use projection::{ProjectionEngine, ProjectionConfig, ProjectionInputs, ProjectionResult, ProjectionSnapshot};
