//! Running state of a single projection

use super::DAYS_PER_MONTH_UNIT;
use crate::catalog::{ProductTier, Yen};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How months since purchase are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElapsedMonths {
    /// floor(days / 30). Calendar months of 28-31 days make the count skip
    /// or repeat a value now and then.
    #[default]
    ThirtyDayUnit,
    /// Whole projection months between purchase and the evaluated month
    Calendar,
}

/// One active investment position
#[derive(Debug, Clone)]
pub struct ActiveLot<'a> {
    pub tier: &'a ProductTier,
    pub quantity: u32,
    pub purchase_date: NaiveDate,
    /// Projection month index the lot was bought in
    pub purchase_month: u32,
}

impl<'a> ActiveLot<'a> {
    pub fn new(tier: &'a ProductTier, quantity: u32, purchase_date: NaiveDate, purchase_month: u32) -> Self {
        Self {
            tier,
            quantity,
            purchase_date,
            purchase_month,
        }
    }

    /// Months since purchase as seen from `month` / `month_date`
    pub fn months_elapsed(&self, month: u32, month_date: NaiveDate, mode: ElapsedMonths) -> i64 {
        match mode {
            ElapsedMonths::ThirtyDayUnit => {
                (month_date - self.purchase_date).num_days().div_euclid(DAYS_PER_MONTH_UNIT)
            }
            ElapsedMonths::Calendar => i64::from(month) - i64::from(self.purchase_month),
        }
    }

    pub fn monthly_rental(&self) -> Yen {
        self.tier.monthly_rental * Yen::from(self.quantity)
    }

    pub fn resale_payout(&self) -> Yen {
        self.tier.resale_value * Yen::from(self.quantity)
    }
}

/// Cumulative totals plus the lots alive at the current month
#[derive(Debug, Clone)]
pub struct ProjectionState<'a> {
    pub total_investment: Yen,
    pub total_revenue: Yen,
    pub lots: Vec<ActiveLot<'a>>,
}

impl<'a> ProjectionState<'a> {
    /// Start-of-plan state: the first lot is bought on the start date
    pub fn initial(tier: &'a ProductTier, quantity: u32, start_date: NaiveDate) -> Self {
        Self {
            total_investment: tier.price * Yen::from(quantity),
            total_revenue: 0,
            lots: vec![ActiveLot::new(tier, quantity, start_date, 0)],
        }
    }

    /// Buy `tier` and make it the only active lot
    pub fn upgrade(&mut self, tier: &'a ProductTier, quantity: u32, date: NaiveDate, month: u32) {
        self.total_investment += tier.price * Yen::from(quantity);
        self.lots = vec![ActiveLot::new(tier, quantity, date, month)];
    }

    /// Drop every active lot
    pub fn resell(&mut self) {
        self.lots.clear();
    }

    pub fn balance(&self) -> Yen {
        self.total_revenue - self.total_investment
    }

    /// Comma-joined display names of the active lots
    pub fn active_label(&self) -> String {
        self.lots
            .iter()
            .map(|lot| lot.tier.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductCatalog;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_thirty_day_unit() {
        let catalog = ProductCatalog::default();
        let lot = ActiveLot::new(catalog.get("TYPE-D").unwrap(), 1, date(2024, 4, 1), 0);
        let mode = ElapsedMonths::ThirtyDayUnit;

        assert_eq!(lot.months_elapsed(1, date(2024, 5, 1), mode), 1); // 30 days
        assert_eq!(lot.months_elapsed(2, date(2024, 6, 1), mode), 2); // 61 days
        assert_eq!(lot.months_elapsed(4, date(2024, 8, 1), mode), 4); // 122 days

        // February start: 59 days after two calendar months, 120 after four
        let feb = ActiveLot::new(catalog.get("TYPE-D").unwrap(), 1, date(2023, 2, 1), 0);
        assert_eq!(feb.months_elapsed(2, date(2023, 4, 1), mode), 1);
        assert_eq!(feb.months_elapsed(3, date(2023, 5, 1), mode), 2);
        assert_eq!(feb.months_elapsed(4, date(2023, 6, 1), mode), 4);
    }

    #[test]
    fn test_calendar_mode() {
        let catalog = ProductCatalog::default();
        let lot = ActiveLot::new(catalog.get("TYPE-V").unwrap(), 2, date(2023, 6, 1), 4);

        assert_eq!(lot.months_elapsed(4, date(2023, 6, 1), ElapsedMonths::Calendar), 0);
        assert_eq!(lot.months_elapsed(6, date(2023, 8, 1), ElapsedMonths::Calendar), 2);
        assert_eq!(lot.monthly_rental(), 880_000);
        assert_eq!(lot.resale_payout(), 6_860_000);
    }

    #[test]
    fn test_state_transitions() {
        let catalog = ProductCatalog::default();
        let start = date(2024, 4, 1);
        let mut state = ProjectionState::initial(catalog.get("TYPE-D").unwrap(), 1, start);

        assert_eq!(state.total_investment, 4_500_000);
        assert_eq!(state.balance(), -4_500_000);
        assert_eq!(state.active_label(), "ZEXABOX PRO Type-D");

        state.upgrade(catalog.get("TYPE-V").unwrap(), 1, date(2024, 8, 1), 4);
        assert_eq!(state.total_investment, 8_460_000);
        assert_eq!(state.lots.len(), 1);
        assert_eq!(state.active_label(), "ZEXABOX PRO Type-V");

        state.resell();
        assert!(state.lots.is_empty());
        assert_eq!(state.active_label(), "");
    }
}
