//! Decision data structures

use crate::catalog::ProductCatalog;
use crate::error::Result;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// What to do with the active lot at a decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    /// Buy the successor tier and replace the active lot with it
    Upgrade,
    /// Drop the active lot; nothing earns afterwards
    Resale,
}

impl std::str::FromStr for DecisionAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upgrade" => Ok(DecisionAction::Upgrade),
            "resale" | "resell" => Ok(DecisionAction::Resale),
            other => Err(format!("unknown decision action '{}'", other)),
        }
    }
}

/// A user choice recorded against a projection month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Projection month index (0 = start month)
    pub month: u32,

    /// Tier held when the decision was made
    pub from_tier: String,

    pub action: DecisionAction,

    /// Destination tier, present only for upgrades
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_tier: Option<String>,
}

impl Decision {
    pub fn upgrade(month: u32, from_tier: impl Into<String>, to_tier: impl Into<String>) -> Self {
        Self {
            month,
            from_tier: from_tier.into(),
            action: DecisionAction::Upgrade,
            to_tier: Some(to_tier.into()),
        }
    }

    pub fn resale(month: u32, from_tier: impl Into<String>) -> Self {
        Self {
            month,
            from_tier: from_tier.into(),
            action: DecisionAction::Resale,
            to_tier: None,
        }
    }

    /// Date shown next to the decision in the history list.
    ///
    /// Uses 30-day months from the start date, so it can differ from the
    /// calendar month the projection applies the decision in.
    pub fn display_date(&self, start_date: NaiveDate) -> NaiveDate {
        start_date + Duration::days(i64::from(self.month) * 30)
    }

    /// History line, e.g. "2024/08: ZEXABOX PRO Type-D -> ZEXABOX PRO Type-V upgrade"
    pub fn describe(&self, catalog: &ProductCatalog, start_date: NaiveDate) -> Result<String> {
        let from = &catalog.get(&self.from_tier)?.name;
        let date = self.display_date(start_date).format("%Y/%m");
        let text = match (self.action, &self.to_tier) {
            (DecisionAction::Upgrade, Some(to)) => {
                format!("{}: {} -> {} upgrade", date, from, catalog.get(to)?.name)
            }
            (DecisionAction::Upgrade, None) => format!("{}: {} upgrade", date, from),
            (DecisionAction::Resale, _) => format!("{}: {} resale", date, from),
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!("upgrade".parse::<DecisionAction>().unwrap(), DecisionAction::Upgrade);
        assert_eq!("Resale".parse::<DecisionAction>().unwrap(), DecisionAction::Resale);
        assert!("hold".parse::<DecisionAction>().is_err());
    }

    #[test]
    fn test_describe() {
        let catalog = ProductCatalog::default();
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        // 4 * 30 days = 120 days -> 2024-07-30
        let up = Decision::upgrade(4, "TYPE-D", "TYPE-V");
        assert_eq!(up.display_date(start), NaiveDate::from_ymd_opt(2024, 7, 30).unwrap());
        assert_eq!(
            up.describe(&catalog, start).unwrap(),
            "2024/07: ZEXABOX PRO Type-D -> ZEXABOX PRO Type-V upgrade"
        );

        let sell = Decision::resale(8, "TYPE-V");
        assert_eq!(sell.describe(&catalog, start).unwrap(), "2024/11: ZEXABOX PRO Type-V resale");

        assert!(Decision::resale(4, "TYPE-Q").describe(&catalog, start).is_err());
    }

    #[test]
    fn test_serde_shape() {
        let json = r#"{"month":4,"from_tier":"TYPE-D","action":"upgrade","to_tier":"TYPE-V"}"#;
        let decision: Decision = serde_json::from_str(json).unwrap();
        assert_eq!(decision, Decision::upgrade(4, "TYPE-D", "TYPE-V"));

        let resale = serde_json::to_string(&Decision::resale(4, "TYPE-D")).unwrap();
        assert_eq!(resale, r#"{"month":4,"from_tier":"TYPE-D","action":"resale"}"#);
    }
}
