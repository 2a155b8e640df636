//! Scenario parameters loaded from JSON
//!
//! Every field has a default, so `{}` is a valid scenario: TYPE-D, one unit,
//! starting 2024-04-01, no decisions.

use super::Decision;
use crate::error::Result;
use crate::projection::{ProjectionConfig, ProjectionInputs};
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Inputs plus engine settings for one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// First projection month
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Tier bought on the start date
    #[serde(default = "default_tier")]
    pub tier: String,

    /// Units bought (1 to 20)
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Recorded decisions, oldest first
    #[serde(default)]
    pub decisions: Vec<Decision>,

    #[serde(default)]
    pub config: ProjectionConfig,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default()
}
fn default_tier() -> String { "TYPE-D".to_string() }
fn default_quantity() -> u32 { 1 }

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            tier: default_tier(),
            quantity: default_quantity(),
            decisions: Vec::new(),
            config: ProjectionConfig::default(),
        }
    }
}

impl ScenarioParams {
    /// Projection inputs described by these parameters
    pub fn to_inputs(&self) -> ProjectionInputs {
        ProjectionInputs::new(self.start_date, self.tier.clone(), self.quantity)
            .with_decisions(self.decisions.clone())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Load scenario parameters from a JSON file
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioParams> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let params = ScenarioParams::from_reader(BufReader::new(file))?;
    info!(
        "Loaded scenario from {}: {} x{} from {}, {} decisions",
        path.display(),
        params.tier,
        params.quantity,
        params.start_date,
        params.decisions.len()
    );
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::DecisionAction;
    use crate::projection::ElapsedMonths;

    #[test]
    fn test_empty_json_uses_defaults() {
        let params = ScenarioParams::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(params, ScenarioParams::default());
        assert_eq!(params.config.horizon_months, 24);
        assert_eq!(params.config.elapsed_months, ElapsedMonths::ThirtyDayUnit);
    }

    #[test]
    fn test_full_scenario() {
        let json = r#"{
            "start_date": "2025-01-15",
            "tier": "TYPE-V",
            "quantity": 4,
            "decisions": [
                {"month": 4, "from_tier": "TYPE-V", "action": "upgrade", "to_tier": "TYPE-K"},
                {"month": 8, "from_tier": "TYPE-K", "action": "resale"}
            ],
            "config": {"elapsed_months": "calendar"}
        }"#;
        let params = ScenarioParams::from_reader(json.as_bytes()).unwrap();

        assert_eq!(params.quantity, 4);
        assert_eq!(params.decisions[1].action, DecisionAction::Resale);
        assert_eq!(params.config.elapsed_months, ElapsedMonths::Calendar);
        assert_eq!(params.config.ramp_up_months, 2);

        let inputs = params.to_inputs();
        assert_eq!(inputs.start_tier, "TYPE-V");
        assert_eq!(inputs.decisions.len(), 2);
    }

    #[test]
    fn test_bundled_scenario_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/scenario_upgrade.json");
        let params = load_scenario(path).unwrap();
        assert_eq!(params.tier, "TYPE-D");
        assert!(!params.decisions.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(ScenarioParams::from_reader(r#"{"quantity": "many"}"#.as_bytes()).is_err());
    }
}
