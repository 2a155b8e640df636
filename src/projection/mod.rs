//! Projection engine for rental-then-resale investment plans

mod state;
mod engine;
mod cashflows;

pub use state::{ActiveLot, ElapsedMonths, ProjectionState};
pub use engine::{ProjectionEngine, ProjectionConfig, ProjectionInputs};
pub use cashflows::{ProjectionSnapshot, ProjectionResult, format_profit_rate, profit_rate_pct};

// ============================================================================
// Plan constants
// ============================================================================
// Rental starts two months after purchase. Quantities are limited to what
// the planning form accepts.

/// Projection horizon in months; snapshots cover months 0..=horizon
pub const DEFAULT_HORIZON_MONTHS: u32 = 24;

/// Longest horizon a scenario may request (ten years)
pub const MAX_HORIZON_MONTHS: u32 = 120;

/// Months after purchase before rental income starts
pub const DEFAULT_RAMP_UP_MONTHS: u32 = 2;

/// Smallest accepted unit quantity
pub const MIN_QUANTITY: u32 = 1;

/// Largest accepted unit quantity
pub const MAX_QUANTITY: u32 = 20;

/// Length of the fixed month unit used for elapsed-month counting
pub const DAYS_PER_MONTH_UNIT: i64 = 30;
