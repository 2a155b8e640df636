//! Decisions, scenario parameters and the interactive planning session

mod data;
pub mod params;
pub mod session;

pub use data::{Decision, DecisionAction};
pub use params::{load_scenario, ScenarioParams};
pub use session::{PendingDecision, PlanSession, DECISION_CADENCE_MONTHS, FIRST_DECISION_MONTH};
