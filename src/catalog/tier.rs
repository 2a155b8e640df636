//! Device tiers, the upgrade chain between them, and per-quantity quotes

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Whole yen
pub type Yen = i64;

/// A purchasable device configuration with fixed rental and resale economics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTier {
    /// Catalog key, e.g. "TYPE-D"
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit purchase price
    pub price: Yen,

    /// Rental income per unit per month once the ramp-up has passed
    pub monthly_rental: Yen,

    /// Per-unit payout credited when the holding period is reached
    pub resale_value: Yen,

    /// Resale value as a percentage of price (display only)
    pub resale_percentage: f64,

    /// Advertised maximum profit percentage (display only)
    pub max_profit: f64,

    /// Holding period in months after which the resale value is realized
    pub rental_months: u32,

    /// Unit quantity limit for this tier (display only)
    pub limit: u32,

    /// Identifier of the tier this one upgrades into
    pub next_tier: Option<String>,

    pub description: String,
}

impl ProductTier {
    #[allow(clippy::too_many_arguments)]
    fn builtin(
        id: &str,
        name: &str,
        price: Yen,
        monthly_rental: Yen,
        resale_value: Yen,
        resale_percentage: f64,
        max_profit: f64,
        rental_months: u32,
        limit: u32,
        next_tier: Option<&str>,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
            monthly_rental,
            resale_value,
            resale_percentage,
            max_profit,
            rental_months,
            limit,
            next_tier: next_tier.map(str::to_string),
            description: description.to_string(),
        }
    }

    /// True for the last tier of the chain
    pub fn is_terminal(&self) -> bool {
        self.next_tier.is_none()
    }
}

/// Cost of moving the current lot to the successor tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeQuote {
    pub to_tier: String,
    pub name: String,
    pub cost: Yen,
}

/// Current-tier figures scaled by quantity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierQuote {
    pub tier_id: String,
    pub name: String,
    pub quantity: u32,
    pub purchase_price: Yen,
    pub monthly_rental: Yen,
    pub resale_value: Yen,
    pub upgrade: Option<UpgradeQuote>,
}

/// Read-only mapping from tier identifier to tier, in chain order
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    tiers: Vec<ProductTier>,
    index: HashMap<String, usize>,
}

impl ProductCatalog {
    /// Build a catalog, checking that the tiers form one chain ending in a terminal tier
    pub fn new(tiers: Vec<ProductTier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(ProjectionError::InvalidCatalog("catalog has no tiers".to_string()));
        }

        let mut index = HashMap::with_capacity(tiers.len());
        for (i, tier) in tiers.iter().enumerate() {
            if index.insert(tier.id.clone(), i).is_some() {
                return Err(ProjectionError::InvalidCatalog(format!("duplicate tier id {}", tier.id)));
            }
        }

        let mut referenced = HashSet::new();
        for tier in &tiers {
            if let Some(next) = &tier.next_tier {
                if !index.contains_key(next) {
                    return Err(ProjectionError::InvalidCatalog(format!(
                        "tier {} points to unknown successor {}",
                        tier.id, next
                    )));
                }
                referenced.insert(next.as_str());
            }
        }

        let heads: Vec<&ProductTier> = tiers
            .iter()
            .filter(|t| !referenced.contains(t.id.as_str()))
            .collect();
        if heads.len() != 1 {
            return Err(ProjectionError::InvalidCatalog(format!(
                "expected exactly one entry tier, found {}",
                heads.len()
            )));
        }

        // Walk from the entry tier; every tier must be visited exactly once
        let mut visited = HashSet::new();
        let mut cursor = Some(heads[0]);
        while let Some(tier) = cursor {
            if !visited.insert(tier.id.as_str()) {
                return Err(ProjectionError::InvalidCatalog(format!(
                    "upgrade chain loops back to {}",
                    tier.id
                )));
            }
            cursor = tier.next_tier.as_ref().map(|next| &tiers[index[next]]);
        }
        if visited.len() != tiers.len() {
            return Err(ProjectionError::InvalidCatalog(
                "upgrade chain does not reach every tier".to_string(),
            ));
        }

        Ok(Self { tiers, index })
    }

    /// Look up a tier by identifier
    pub fn get(&self, id: &str) -> Result<&ProductTier> {
        self.index
            .get(id)
            .map(|&i| &self.tiers[i])
            .ok_or_else(|| ProjectionError::UnknownTier(id.to_string()))
    }

    /// Successor of a tier, `None` for the last tier
    pub fn successor(&self, id: &str) -> Result<Option<&ProductTier>> {
        match &self.get(id)?.next_tier {
            Some(next) => self.get(next).map(Some),
            None => Ok(None),
        }
    }

    /// The tier with no predecessor (new purchases start here)
    pub fn entry_tier(&self) -> &ProductTier {
        let referenced: HashSet<&str> = self
            .tiers
            .iter()
            .filter_map(|t| t.next_tier.as_deref())
            .collect();
        self.tiers
            .iter()
            .find(|t| !referenced.contains(t.id.as_str()))
            .unwrap_or(&self.tiers[0])
    }

    /// Tiers in the order they were defined
    pub fn tiers(&self) -> &[ProductTier] {
        &self.tiers
    }

    /// Price, rental and resale of a tier scaled by quantity, with the successor's upgrade cost
    pub fn quote(&self, id: &str, quantity: u32) -> Result<TierQuote> {
        let tier = self.get(id)?;
        let qty = Yen::from(quantity);
        let upgrade = self.successor(id)?.map(|next| UpgradeQuote {
            to_tier: next.id.clone(),
            name: next.name.clone(),
            cost: next.price * qty,
        });

        Ok(TierQuote {
            tier_id: tier.id.clone(),
            name: tier.name.clone(),
            quantity,
            purchase_price: tier.price * qty,
            monthly_rental: tier.monthly_rental * qty,
            resale_value: tier.resale_value * qty,
            upgrade,
        })
    }
}

impl Default for ProductCatalog {
    /// The four ZEXABOX PRO tiers
    fn default() -> Self {
        let tiers = vec![
            ProductTier::builtin(
                "TYPE-D", "ZEXABOX PRO Type-D",
                4_500_000, 506_000, 3_847_500, 85.5, 130.4, 4, 140,
                Some("TYPE-V"), "新規購入可能",
            ),
            ProductTier::builtin(
                "TYPE-V", "ZEXABOX PRO Type-V",
                3_960_000, 440_000, 3_430_000, 86.6, 131.0, 4, 180,
                Some("TYPE-K"), "TYPE-D所有者向け",
            ),
            ProductTier::builtin(
                "TYPE-K", "ZEXABOX PRO Type-K",
                3_430_000, 350_000, 2_710_000, 79.88, 130.0, 4, 180,
                Some("TYPE-X"), "TYPE-V所有者向け",
            ),
            ProductTier::builtin(
                "TYPE-X", "ZEXABOX PRO Type-X",
                2_710_000, 275_000, 2_156_000, 79.56, 130.0, 5, 180,
                None, "TYPE-K所有者向け",
            ),
        ];

        let index = tiers
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        Self { tiers, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tier(id: &str, next: Option<&str>) -> ProductTier {
        ProductTier::builtin(id, id, 100, 10, 80, 80.0, 120.0, 4, 10, next, "")
    }

    #[test]
    fn test_default_chain() {
        let catalog = ProductCatalog::default();

        let mut chain = vec![catalog.entry_tier().id.clone()];
        while let Some(next) = catalog.successor(chain.last().unwrap()).unwrap() {
            chain.push(next.id.clone());
        }
        assert_eq!(chain, ["TYPE-D", "TYPE-V", "TYPE-K", "TYPE-X"]);
        assert!(catalog.get("TYPE-X").unwrap().is_terminal());

        // Built-in table passes the same validation as loaded catalogs
        assert!(ProductCatalog::new(catalog.tiers().to_vec()).is_ok());
    }

    #[test]
    fn test_builtin_values() {
        let catalog = ProductCatalog::default();

        let d = catalog.get("TYPE-D").unwrap();
        assert_eq!(d.price, 4_500_000);
        assert_eq!(d.monthly_rental, 506_000);
        assert_eq!(d.resale_value, 3_847_500);
        assert_eq!(d.rental_months, 4);
        assert_relative_eq!(d.resale_percentage, 85.5);

        let x = catalog.get("TYPE-X").unwrap();
        assert_eq!(x.rental_months, 5);
        assert_eq!(x.resale_value, 2_156_000);
    }

    #[test]
    fn test_unknown_tier() {
        let catalog = ProductCatalog::default();
        match catalog.get("TYPE-Z") {
            Err(ProjectionError::UnknownTier(id)) => assert_eq!(id, "TYPE-Z"),
            other => panic!("expected UnknownTier, got {:?}", other),
        }
        assert!(catalog.quote("TYPE-Z", 1).is_err());
    }

    #[test]
    fn test_quote_scales_by_quantity() {
        let catalog = ProductCatalog::default();

        let quote = catalog.quote("TYPE-D", 3).unwrap();
        assert_eq!(quote.purchase_price, 13_500_000);
        assert_eq!(quote.monthly_rental, 1_518_000);
        assert_eq!(quote.resale_value, 11_542_500);
        let upgrade = quote.upgrade.unwrap();
        assert_eq!(upgrade.to_tier, "TYPE-V");
        assert_eq!(upgrade.cost, 11_880_000);

        // Last tier offers no upgrade
        assert!(catalog.quote("TYPE-X", 1).unwrap().upgrade.is_none());
    }

    #[test]
    fn test_rejects_broken_chains() {
        // Dangling successor
        assert!(ProductCatalog::new(vec![tier("A", Some("B"))]).is_err());

        // Two entry tiers
        assert!(ProductCatalog::new(vec![tier("A", None), tier("B", None)]).is_err());

        // Loop after the entry tier
        let looped = vec![tier("A", Some("B")), tier("B", Some("C")), tier("C", Some("B"))];
        assert!(ProductCatalog::new(looped).is_err());

        // Duplicate identifiers
        assert!(ProductCatalog::new(vec![tier("A", None), tier("A", None)]).is_err());

        assert!(ProductCatalog::new(Vec::new()).is_err());

        let ok = ProductCatalog::new(vec![tier("B", None), tier("A", Some("B"))]).unwrap();
        assert_eq!(ok.entry_tier().id, "A");
    }
}
