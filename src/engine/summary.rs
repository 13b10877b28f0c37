//! Daily aggregation over sale records.

use crate::domain::{Kilograms, Money, SaleDate, Transaction};
use std::collections::BTreeMap;

/// Totals for one day of sales.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySummary {
    pub total_price: Money,
    pub total_gas: Kilograms,
    pub count: u64,
}

impl DailySummary {
    fn add(&mut self, tx: &Transaction) {
        self.total_price += tx.total_price;
        self.total_gas += tx.total_gas;
        self.count += 1;
    }
}

/// Sum a day's worth of transactions. Sums are carried in Decimal so
/// repeated 0.1 kg steps stay exact.
pub fn summarize(transactions: &[Transaction]) -> DailySummary {
    let mut summary = DailySummary::default();
    for tx in transactions {
        summary.add(tx);
    }
    summary
}

/// Group transactions by sale date and sum each day. The BTreeMap keeps
/// days in ascending date order for listing.
pub fn summarize_by_date(transactions: &[Transaction]) -> BTreeMap<SaleDate, DailySummary> {
    let mut days: BTreeMap<SaleDate, DailySummary> = BTreeMap::new();
    for tx in transactions {
        days.entry(tx.sale_date()).or_default().add(tx);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BottleCounts, CustomerTier, SaleId};
    use chrono::NaiveDate;

    fn tx(date: &str, price: &str, gas: &str) -> Transaction {
        let timestamp = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Transaction::new(
            SaleId::generate(),
            timestamp,
            CustomerTier::Retail,
            BottleCounts::new(0, 0, 1),
            Money::from_str_canonical(price).unwrap(),
            Kilograms::from_str_canonical(gas).unwrap(),
        )
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert!(summary.total_price.is_zero());
        assert!(summary.total_gas.is_zero());
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn test_summarize_sums_all_fields() {
        let txs = vec![
            tx("2024-01-01", "730", "2.7"),
            tx("2024-01-01", "730", "2.7"),
            tx("2024-01-01", "730", "2.7"),
        ];
        let summary = summarize(&txs);
        assert_eq!(summary.total_price.to_canonical_string(), "2190");
        assert_eq!(summary.total_gas.to_canonical_string(), "8.1");
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn test_summarize_by_date_groups_and_orders() {
        let txs = vec![
            tx("2024-01-03", "100", "1"),
            tx("2024-01-01", "200", "2"),
            tx("2024-01-03", "300", "3"),
        ];
        let days = summarize_by_date(&txs);
        assert_eq!(days.len(), 2);

        let dates: Vec<String> = days.keys().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-03"]);

        let jan3 = &days[&txs[0].sale_date()];
        assert_eq!(jan3.total_price.to_canonical_string(), "400");
        assert_eq!(jan3.count, 2);
    }
}
