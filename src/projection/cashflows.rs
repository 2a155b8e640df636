//! Monthly snapshot rows and projection results

use crate::catalog::Yen;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Profit rate in percent: (revenue / investment - 1) * 100, or 0 with no investment
pub fn profit_rate_pct(revenue: Yen, investment: Yen) -> f64 {
    if investment > 0 {
        (revenue as f64 / investment as f64 - 1.0) * 100.0
    } else {
        0.0
    }
}

/// Profit rate rounded to one decimal, "0.0" with no investment
pub fn format_profit_rate(revenue: Yen, investment: Yen) -> String {
    format!("{:.1}", profit_rate_pct(revenue, investment))
}

/// One month of projected results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSnapshot {
    /// Calendar label, "YYYY/MM"
    pub label: String,
    pub date: NaiveDate,
    /// 0-based projection month
    pub month_index: u32,
    /// 1-based month number shown in tables
    pub month_number: u32,
    /// Comma-joined names of the tiers held at the end of the month
    pub active_tiers: String,
    /// Cumulative purchase spend
    pub investment: Yen,
    /// Cumulative rental and resale income
    pub revenue: Yen,
    /// revenue - investment
    pub balance: Yen,
    /// Rental income accrued this month
    pub monthly_revenue: Yen,
    /// Percent, one decimal
    pub profit_rate: String,
}

/// Complete projection output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub snapshots: Vec<ProjectionSnapshot>,
}

impl ProjectionResult {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot for a 0-based projection month
    pub fn month(&self, month_index: u32) -> Option<&ProjectionSnapshot> {
        self.snapshots.get(month_index as usize)
    }

    pub fn final_snapshot(&self) -> Option<&ProjectionSnapshot> {
        self.snapshots.last()
    }

    /// First month whose cumulative balance is non-negative
    pub fn break_even_month(&self) -> Option<u32> {
        self.snapshots
            .iter()
            .find(|s| s.balance >= 0)
            .map(|s| s.month_index)
    }

    /// Total rental income over the horizon
    pub fn total_rental(&self) -> Yen {
        self.snapshots.iter().map(|s| s.monthly_revenue).sum()
    }

    /// Write the snapshot table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for snapshot in &self.snapshots {
            wtr.serialize(snapshot)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshots)?)
    }
}
