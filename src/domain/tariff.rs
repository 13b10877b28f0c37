//! Fixed tariff tables: per-tier bottle prices and per-size bottle masses.

use crate::domain::{BottleSize, CustomerTier, Kilograms, Money};
use rust_decimal::Decimal;

/// Price and mass tables for bottled gas, indexed by tier and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tariff {
    prices: [[Money; 3]; 3],
    weights: [Kilograms; 3],
}

fn mru(units: i64) -> Money {
    Money::new(Decimal::from(units))
}

impl Tariff {
    /// The tariff in force. Prices in MRU, masses in kilograms.
    pub fn standard() -> Self {
        Tariff {
            prices: [
                // Retail: large, medium, small
                [mru(3330), mru(1600), mru(730)],
                // Wholesale
                [mru(3130), mru(1505), mru(685)],
                // Reseller
                [mru(3200), mru(1535), mru(700)],
            ],
            weights: [
                Kilograms::new(Decimal::from(12)),
                Kilograms::new(Decimal::from(6)),
                Kilograms::new(Decimal::new(27, 1)),
            ],
        }
    }

    /// Unit price for one bottle of `size` sold to `tier`.
    pub fn unit_price(&self, tier: CustomerTier, size: BottleSize) -> Money {
        self.prices[tier.index()][size.index()]
    }

    /// Mass of one bottle of `size`.
    pub fn unit_weight(&self, size: BottleSize) -> Kilograms {
        self.weights[size.index()]
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retail_prices() {
        let t = Tariff::standard();
        assert_eq!(
            t.unit_price(CustomerTier::Retail, BottleSize::Large)
                .to_canonical_string(),
            "3330"
        );
        assert_eq!(
            t.unit_price(CustomerTier::Retail, BottleSize::Medium)
                .to_canonical_string(),
            "1600"
        );
        assert_eq!(
            t.unit_price(CustomerTier::Retail, BottleSize::Small)
                .to_canonical_string(),
            "730"
        );
    }

    #[test]
    fn test_wholesale_and_reseller_prices() {
        let t = Tariff::standard();
        assert_eq!(
            t.unit_price(CustomerTier::Wholesale, BottleSize::Large)
                .to_canonical_string(),
            "3130"
        );
        assert_eq!(
            t.unit_price(CustomerTier::Wholesale, BottleSize::Small)
                .to_canonical_string(),
            "685"
        );
        assert_eq!(
            t.unit_price(CustomerTier::Reseller, BottleSize::Medium)
                .to_canonical_string(),
            "1535"
        );
    }

    #[test]
    fn test_bottle_masses() {
        let t = Tariff::standard();
        assert_eq!(
            t.unit_weight(BottleSize::Large).to_canonical_string(),
            "12"
        );
        assert_eq!(t.unit_weight(BottleSize::Medium).to_canonical_string(), "6");
        assert_eq!(
            t.unit_weight(BottleSize::Small).to_canonical_string(),
            "2.7"
        );
    }
}
