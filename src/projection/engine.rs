//! Month-by-month projection of rental income, resale payouts and upgrades

use super::cashflows::{format_profit_rate, ProjectionResult, ProjectionSnapshot};
use super::state::{ElapsedMonths, ProjectionState};
use super::{DEFAULT_HORIZON_MONTHS, DEFAULT_RAMP_UP_MONTHS, MAX_HORIZON_MONTHS, MAX_QUANTITY, MIN_QUANTITY};
use crate::catalog::{ProductCatalog, Yen};
use crate::error::{ProjectionError, Result};
use crate::plan::{Decision, DecisionAction};
use chrono::{Months, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Engine settings; `Default` reproduces the planning page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Last projected month (snapshots cover 0..=horizon_months)
    #[serde(default = "default_horizon")]
    pub horizon_months: u32,

    /// Months after purchase before rental income starts
    #[serde(default = "default_ramp_up")]
    pub ramp_up_months: u32,

    /// Counting rule for months since purchase
    #[serde(default)]
    pub elapsed_months: ElapsedMonths,
}

fn default_horizon() -> u32 { DEFAULT_HORIZON_MONTHS }
fn default_ramp_up() -> u32 { DEFAULT_RAMP_UP_MONTHS }

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            ramp_up_months: DEFAULT_RAMP_UP_MONTHS,
            elapsed_months: ElapsedMonths::ThirtyDayUnit,
        }
    }
}

/// Everything a projection depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInputs {
    pub start_date: NaiveDate,
    pub start_tier: String,
    pub quantity: u32,
    /// Decision history, in the order it was recorded
    pub decisions: Vec<Decision>,
}

impl ProjectionInputs {
    pub fn new(start_date: NaiveDate, start_tier: impl Into<String>, quantity: u32) -> Self {
        Self {
            start_date,
            start_tier: start_tier.into(),
            quantity,
            decisions: Vec::new(),
        }
    }

    pub fn with_decisions(mut self, decisions: Vec<Decision>) -> Self {
        self.decisions = decisions;
        self
    }

    /// First recorded decision for a month; later ones for the same month never fire
    pub fn decision_for(&self, month: u32) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.month == month)
    }
}

/// Pure projection engine. Holds only read-only data; every call recomputes from month 0.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    catalog: ProductCatalog,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(catalog: ProductCatalog, config: ProjectionConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Check horizon, tier identifiers, quantity and decision shape before projecting
    pub fn validate(&self, inputs: &ProjectionInputs) -> Result<()> {
        if self.config.horizon_months > MAX_HORIZON_MONTHS {
            return Err(ProjectionError::InvalidHorizon {
                months: self.config.horizon_months,
                max: MAX_HORIZON_MONTHS,
            });
        }
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&inputs.quantity) {
            return Err(ProjectionError::InvalidQuantity {
                quantity: inputs.quantity,
                min: MIN_QUANTITY,
                max: MAX_QUANTITY,
            });
        }
        self.catalog.get(&inputs.start_tier)?;

        for decision in &inputs.decisions {
            self.catalog.get(&decision.from_tier)?;
            if decision.action == DecisionAction::Upgrade {
                let to = decision
                    .to_tier
                    .as_deref()
                    .ok_or(ProjectionError::MissingUpgradeTarget { month: decision.month })?;
                self.catalog.get(to)?;
            }
            if decision.month > self.config.horizon_months {
                warn!(
                    "Decision at month {} is past the {}-month horizon and will not apply",
                    decision.month, self.config.horizon_months
                );
            }
        }
        Ok(())
    }

    /// Calendar date of a projection month
    pub fn month_date(&self, start_date: NaiveDate, month: u32) -> Result<NaiveDate> {
        start_date
            .checked_add_months(Months::new(month))
            .ok_or(ProjectionError::InvalidDate { start: start_date, months: month })
    }

    /// Project months 0..=horizon for the given inputs
    pub fn project(&self, inputs: &ProjectionInputs) -> Result<ProjectionResult> {
        self.validate(inputs)?;

        let start_tier = self.catalog.get(&inputs.start_tier)?;
        let quantity = inputs.quantity;
        let ramp_up = i64::from(self.config.ramp_up_months);
        let mut state = ProjectionState::initial(start_tier, quantity, inputs.start_date);
        let mut snapshots = Vec::new();

        for month in 0..=self.config.horizon_months {
            let month_date = self.month_date(inputs.start_date, month)?;
            let mut monthly_revenue: Yen = 0;

            // Income from lots held coming into this month
            for lot in &state.lots {
                let elapsed = lot.months_elapsed(month, month_date, self.config.elapsed_months);

                if elapsed >= ramp_up {
                    monthly_revenue += lot.monthly_rental();
                }

                // Rental and resale can both land in the same month
                if elapsed == i64::from(lot.tier.rental_months) {
                    let payout = lot.resale_payout();
                    state.total_revenue += payout;
                    debug!("Month {}: resale payout {} for {}", month, payout, lot.tier.id);
                }
            }

            if let Some(decision) = inputs.decision_for(month) {
                match decision.action {
                    DecisionAction::Upgrade => {
                        let to = decision
                            .to_tier
                            .as_deref()
                            .ok_or(ProjectionError::MissingUpgradeTarget { month })?;
                        let tier = self.catalog.get(to)?;
                        state.upgrade(tier, quantity, month_date, month);
                        debug!("Month {}: upgrade {} -> {}", month, decision.from_tier, tier.id);
                    }
                    DecisionAction::Resale => {
                        state.resell();
                        debug!("Month {}: resale of {}", month, decision.from_tier);
                    }
                }
            }

            state.total_revenue += monthly_revenue;

            snapshots.push(ProjectionSnapshot {
                label: month_date.format("%Y/%m").to_string(),
                date: month_date,
                month_index: month,
                month_number: month + 1,
                active_tiers: state.active_label(),
                investment: state.total_investment,
                revenue: state.total_revenue,
                balance: state.balance(),
                monthly_revenue,
                profit_rate: format_profit_rate(state.total_revenue, state.total_investment),
            });
        }

        Ok(ProjectionResult { snapshots })
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new(ProductCatalog::default(), ProjectionConfig::default())
    }
}
