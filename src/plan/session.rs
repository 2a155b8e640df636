//! Interactive planning session
//!
//! Holds the user-editable inputs, the tier the next decision applies to and
//! the month that decision is due. Every edit replays the full projection and
//! is only kept when that projection succeeds.

use super::{Decision, DecisionAction};
use crate::catalog::{ProductTier, TierQuote, Yen};
use crate::error::{ProjectionError, Result};
use crate::projection::{ProjectionEngine, ProjectionInputs, ProjectionResult};
use chrono::NaiveDate;
use log::{debug, info};

/// Month of the first decision point
pub const FIRST_DECISION_MONTH: u32 = 4;

/// Months between decision points after an upgrade
pub const DECISION_CADENCE_MONTHS: u32 = 4;

/// A decision prompt that is currently open
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDecision {
    pub month: u32,
    pub tier_id: String,
    /// Payout for reselling the current tier at this quantity
    pub resale_value: Yen,
    /// Successor and its cost; `None` when only resale is offered
    pub upgrade: Option<(String, Yen)>,
}

#[derive(Debug, Clone)]
pub struct PlanSession {
    engine: ProjectionEngine,
    inputs: ProjectionInputs,
    current_tier: String,
    next_decision_month: u32,
    result: ProjectionResult,
}

impl PlanSession {
    /// Start a session; existing decisions are replayed to position the cursor
    pub fn new(engine: ProjectionEngine, inputs: ProjectionInputs) -> Result<Self> {
        let (current_tier, next_decision_month) = replay_cursor(&engine, &inputs)?;
        let result = engine.project(&inputs)?;
        Ok(Self {
            engine,
            inputs,
            current_tier,
            next_decision_month,
            result,
        })
    }

    pub fn inputs(&self) -> &ProjectionInputs {
        &self.inputs
    }

    pub fn result(&self) -> &ProjectionResult {
        &self.result
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.inputs.decisions
    }

    pub fn next_decision_month(&self) -> u32 {
        self.next_decision_month
    }

    pub fn current_tier(&self) -> Result<&ProductTier> {
        self.engine.catalog().get(&self.current_tier)
    }

    /// Current tier's figures at the session quantity
    pub fn quote(&self) -> Result<TierQuote> {
        self.engine.catalog().quote(&self.current_tier, self.inputs.quantity)
    }

    /// The open decision prompt, if the next decision month falls inside the projection
    pub fn pending_decision(&self) -> Result<Option<PendingDecision>> {
        if self.result.month(self.next_decision_month).is_none()
            || self.inputs.decision_for(self.next_decision_month).is_some()
        {
            return Ok(None);
        }
        let quote = self.quote()?;
        Ok(Some(PendingDecision {
            month: self.next_decision_month,
            tier_id: quote.tier_id,
            resale_value: quote.resale_value,
            upgrade: quote.upgrade.map(|u| (u.to_tier, u.cost)),
        }))
    }

    /// Record a decision at the next decision month and re-project.
    ///
    /// An upgrade moves the cursor to the successor tier and pushes the next
    /// decision out by [`DECISION_CADENCE_MONTHS`]. A resale leaves both as they are.
    pub fn record_decision(&mut self, action: DecisionAction) -> Result<&ProjectionResult> {
        let month = self.next_decision_month;
        let horizon = self.engine.config().horizon_months;
        if month > horizon {
            return Err(ProjectionError::DecisionNotDue { month, horizon });
        }
        if self.inputs.decision_for(month).is_some() {
            return Err(ProjectionError::DecisionAlreadyRecorded(month));
        }

        let successor = self
            .engine
            .catalog()
            .successor(&self.current_tier)?
            .map(|t| t.id.clone());

        let decision = match action {
            DecisionAction::Upgrade => {
                let to = successor.ok_or_else(|| ProjectionError::NoSuccessor(self.current_tier.clone()))?;
                Decision::upgrade(month, self.current_tier.clone(), to)
            }
            DecisionAction::Resale => Decision::resale(month, self.current_tier.clone()),
        };
        let (current_tier, next_month) = match &decision.to_tier {
            Some(to) => (to.clone(), month + DECISION_CADENCE_MONTHS),
            None => (self.current_tier.clone(), month),
        };
        let mut inputs = self.inputs.clone();
        inputs.decisions.push(decision);

        self.commit(inputs, current_tier, next_month)?;
        info!("Recorded {:?} at month {}", action, month);
        Ok(&self.result)
    }

    /// Move the plan to a new start date; an unprojectable date leaves the session untouched
    pub fn set_start_date(&mut self, start_date: NaiveDate) -> Result<&ProjectionResult> {
        let inputs = ProjectionInputs { start_date, ..self.inputs.clone() };
        self.commit(inputs, self.current_tier.clone(), self.next_decision_month)
    }

    /// Change the unit quantity; rejected quantities leave the session untouched
    pub fn set_quantity(&mut self, quantity: u32) -> Result<&ProjectionResult> {
        let inputs = ProjectionInputs { quantity, ..self.inputs.clone() };
        self.commit(inputs, self.current_tier.clone(), self.next_decision_month)
    }

    /// Start over with a different tier; clears the decision history
    pub fn set_start_tier(&mut self, tier_id: &str) -> Result<&ProjectionResult> {
        let tier = self.engine.catalog().get(tier_id)?.id.clone();
        let inputs = ProjectionInputs {
            start_tier: tier.clone(),
            decisions: Vec::new(),
            ..self.inputs.clone()
        };
        self.commit(inputs, tier, FIRST_DECISION_MONTH)
    }

    /// Project candidate inputs and adopt them, with the new cursor, only on success
    fn commit(
        &mut self,
        inputs: ProjectionInputs,
        current_tier: String,
        next_decision_month: u32,
    ) -> Result<&ProjectionResult> {
        let result = self.engine.project(&inputs)?;
        debug!("Re-projected {} months", result.len());

        self.inputs = inputs;
        self.current_tier = current_tier;
        self.next_decision_month = next_decision_month;
        self.result = result;
        Ok(&self.result)
    }
}

/// Tier and due month after replaying a decision history from the start tier
fn replay_cursor(engine: &ProjectionEngine, inputs: &ProjectionInputs) -> Result<(String, u32)> {
    let catalog = engine.catalog();
    let mut tier = catalog.get(&inputs.start_tier)?.id.clone();
    let mut month = FIRST_DECISION_MONTH;

    for decision in &inputs.decisions {
        if decision.action == DecisionAction::Upgrade {
            if let Some(to) = &decision.to_tier {
                tier = catalog.get(to)?.id.clone();
                month += DECISION_CADENCE_MONTHS;
            }
        }
    }
    Ok((tier, month))
}
