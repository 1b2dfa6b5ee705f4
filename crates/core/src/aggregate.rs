//! Cross-wallet aggregation.
//!
//! Groups reconciled rows by market identity and sums amounts and USD
//! values. Which figures count as "supply" is a display convention the
//! caller picks: the literal lend-side supply, or the collateral (the
//! usual convention for borrow dashboards). The aggregator applies the
//! chosen basis without inventing its own semantics.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use vantage_common::types::{AggregatedRow, ReconciledPosition};

/// What to report in the supply columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupplyBasis {
    /// The lend-side supply position.
    #[default]
    Lend,
    /// Collateral amount/USD presented as supply.
    Collateral,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    /// Only rows with an active borrow (display convenience).
    pub active_borrows_only: bool,
    pub basis: SupplyBasis,
}

/// Aggregate reconciled rows (possibly from many wallets) into one row
/// per market. Grouping is keyed on the full display identity so markets
/// sharing a key but differing in trust flag or symbols never merge.
pub fn aggregate(rows: &[ReconciledPosition], options: AggregateOptions) -> Vec<AggregatedRow> {
    let mut groups: BTreeMap<(String, String, String, bool), AggregatedRow> = BTreeMap::new();

    for r in rows {
        if options.active_borrows_only && r.borrow_usd <= Decimal::ZERO {
            continue;
        }

        let (supply_amount, supply_usd) = match options.basis {
            SupplyBasis::Lend => (r.supply_amount, r.supply_usd),
            SupplyBasis::Collateral => (r.collateral_amount, r.collateral_usd),
        };

        let group_key = (
            r.market_key.clone(),
            r.loan_symbol.clone(),
            r.collateral_symbol.clone(),
            r.whitelisted,
        );

        let entry = groups.entry(group_key).or_insert_with(|| AggregatedRow {
            market_key: r.market_key.clone(),
            loan_symbol: r.loan_symbol.clone(),
            collateral_symbol: r.collateral_symbol.clone(),
            whitelisted: r.whitelisted,
            supply_amount: Decimal::ZERO,
            supply_usd: Decimal::ZERO,
            borrow_amount: Decimal::ZERO,
            borrow_usd: Decimal::ZERO,
            collateral_amount: Decimal::ZERO,
            collateral_usd: Decimal::ZERO,
            ltv: None,
            borrow_rate: None,
        });

        entry.supply_amount += supply_amount;
        entry.supply_usd += supply_usd;
        entry.borrow_amount += r.borrow_amount;
        entry.borrow_usd += r.borrow_usd;
        entry.collateral_amount += r.collateral_amount;
        entry.collateral_usd += r.collateral_usd;
    }

    groups
        .into_values()
        .map(|mut row| {
            // never divide by zero, never coerce the ratio to 0 or ∞
            row.ltv = if row.supply_usd > Decimal::ZERO {
                Some(row.borrow_usd / row.supply_usd)
            } else {
                None
            };
            row
        })
        .collect()
}

/// Attach known borrow rates to aggregated rows. Markets without a rate
/// keep `None`; an empty map makes this a no-op.
pub fn annotate_rates(
    rows: &mut [AggregatedRow],
    rates: &std::collections::HashMap<String, f64>,
) {
    for row in rows {
        row.borrow_rate = rates.get(&row.market_key).copied();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn position(
        wallet: &str,
        market_key: &str,
        supply_usd: &str,
        borrow_usd: &str,
        collateral_usd: &str,
    ) -> ReconciledPosition {
        ReconciledPosition {
            wallet: wallet.to_string(),
            market_key: market_key.to_string(),
            loan_symbol: "USDC".into(),
            collateral_symbol: "wstETH".into(),
            supply_amount: dec(supply_usd),
            supply_usd: dec(supply_usd),
            borrow_amount: dec(borrow_usd),
            borrow_usd: dec(borrow_usd),
            collateral_amount: dec(collateral_usd),
            collateral_usd: dec(collateral_usd),
            whitelisted: true,
        }
    }

    #[test]
    fn sums_across_wallets_by_market() {
        let rows = vec![
            position("0xa", "1-0xm1", "1000", "400", "1500"),
            position("0xb", "1-0xm1", "3000", "600", "4500"),
            position("0xa", "1-0xm2", "500", "0", "700"),
        ];
        let agg = aggregate(&rows, AggregateOptions::default());

        assert_eq!(agg.len(), 2);
        let m1 = agg.iter().find(|r| r.market_key == "1-0xm1").unwrap();
        assert_eq!(m1.supply_usd, dec("4000"));
        assert_eq!(m1.borrow_usd, dec("1000"));
        assert_eq!(m1.ltv, Some(dec("0.25")));
    }

    #[test]
    fn active_borrows_filter() {
        let rows = vec![
            position("0xa", "1-0xm1", "1000", "400", "1500"),
            position("0xa", "1-0xm2", "500", "0", "700"),
        ];
        let options = AggregateOptions {
            active_borrows_only: true,
            ..Default::default()
        };
        let agg = aggregate(&rows, options);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].market_key, "1-0xm1");
    }

    #[test]
    fn ltv_undefined_when_no_supply() {
        let rows = vec![position("0xa", "1-0xm1", "0", "100", "0")];
        let agg = aggregate(&rows, AggregateOptions::default());
        assert_eq!(agg[0].ltv, None);
        assert_eq!(agg[0].borrow_usd, dec("100"));
    }

    #[test]
    fn collateral_basis_reports_collateral_as_supply() {
        let rows = vec![position("0xa", "1-0xm1", "1000", "400", "1600")];
        let options = AggregateOptions {
            basis: SupplyBasis::Collateral,
            ..Default::default()
        };
        let agg = aggregate(&rows, options);
        assert_eq!(agg[0].supply_usd, dec("1600"));
        assert_eq!(agg[0].ltv, Some(dec("0.25")));
    }

    #[test]
    fn trust_flag_splits_groups() {
        let mut untrusted = position("0xa", "1-0xm1", "100", "0", "0");
        untrusted.whitelisted = false;
        let rows = vec![position("0xa", "1-0xm1", "100", "0", "0"), untrusted];
        let agg = aggregate(&rows, AggregateOptions::default());
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn rates_attach_by_market_key() {
        let rows = vec![
            position("0xa", "1-0xm1", "1000", "400", "1500"),
            position("0xa", "1-0xm2", "500", "100", "700"),
        ];
        let mut agg = aggregate(&rows, AggregateOptions::default());

        let mut rates = HashMap::new();
        rates.insert("1-0xm1".to_string(), 0.053);
        annotate_rates(&mut agg, &rates);

        let m1 = agg.iter().find(|r| r.market_key == "1-0xm1").unwrap();
        let m2 = agg.iter().find(|r| r.market_key == "1-0xm2").unwrap();
        assert_eq!(m1.borrow_rate, Some(0.053));
        assert_eq!(m2.borrow_rate, None);
    }

    #[test]
    fn empty_rate_map_is_a_noop() {
        let rows = vec![position("0xa", "1-0xm1", "1000", "400", "1500")];
        let mut agg = aggregate(&rows, AggregateOptions::default());
        annotate_rates(&mut agg, &HashMap::new());
        assert_eq!(agg[0].borrow_rate, None);
    }
}
