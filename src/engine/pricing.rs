//! Pricing a sale from the tariff tables.

use crate::domain::{BottleCounts, BottleSize, CustomerTier, Kilograms, Money, Tariff};

/// Priced outcome of a sale: total charge and total gas mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub total_price: Money,
    pub total_gas: Kilograms,
}

/// Price a sale: per-size unit price and unit mass, multiplied by
/// quantity and summed. Totals are always derived here, never taken
/// from client input.
pub fn quote(tariff: &Tariff, tier: CustomerTier, counts: BottleCounts) -> Quote {
    let mut total_price = Money::zero();
    let mut total_gas = Kilograms::zero();
    for size in BottleSize::ALL {
        let qty = counts.get(size);
        total_price += tariff.unit_price(tier, size).times(qty);
        total_gas += tariff.unit_weight(size).times(qty);
    }
    Quote {
        total_price,
        total_gas,
    }
}
