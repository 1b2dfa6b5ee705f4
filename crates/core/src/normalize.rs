//! Raw-amount normalization.
//!
//! The upstream API reports asset amounts sometimes already scaled to
//! human units and sometimes in atomic (base) units, depending on market
//! and API revision. With no explicit unit flag, the only tell is
//! magnitude: an amount exceeding `10^(decimals+2)` cannot plausibly be a
//! human-scale balance, so it is taken as atomic and scaled down. The +2
//! margin keeps legitimately large whole-number balances (a few million
//! of a stablecoin) from being misread as atomic.

use rust_decimal::Decimal;

/// Convert a raw reported amount into a human-scale quantity.
///
/// Negative or malformed input normalizes to zero. Pure and
/// deterministic; all arithmetic stays in `Decimal`.
pub fn normalize_amount(raw: Decimal, decimals: u32) -> Decimal {
    if raw <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let scale = pow10(decimals);
    let threshold = scale
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::MAX);

    if raw > threshold {
        raw / scale
    } else {
        raw
    }
}

/// `10^d` as a Decimal, saturating at `Decimal::MAX` for exponents the
/// 96-bit mantissa cannot hold (which disables atomic detection rather
/// than corrupting it).
fn pow10(d: u32) -> Decimal {
    let mut value = Decimal::ONE;
    for _ in 0..d {
        value = match value.checked_mul(Decimal::TEN) {
            Some(v) => v,
            None => return Decimal::MAX,
        };
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn atomic_18_decimals_is_scaled_down() {
        // 10^20 raw with 18 decimals is clearly atomic → 100
        assert_eq!(
            normalize_amount(dec("100000000000000000000"), 18),
            dec("100")
        );
    }

    #[test]
    fn human_scale_passes_through() {
        assert_eq!(normalize_amount(dec("5000"), 18), dec("5000"));
        assert_eq!(normalize_amount(dec("0.25"), 18), dec("0.25"));
    }

    #[test]
    fn atomic_6_decimals_usdc() {
        // 250_000_000_000 raw with 6 decimals (250k USDC atomic) is scaled
        assert_eq!(normalize_amount(dec("250000000000"), 6), dec("250000"));
    }

    #[test]
    fn boundary_is_exclusive() {
        // exactly 10^(d+2) is still treated as human-scale
        assert_eq!(normalize_amount(dec("100000000"), 6), dec("100000000"));
        assert_eq!(
            normalize_amount(dec("100000001"), 6),
            dec("100.000001")
        );
    }

    #[test]
    fn atomic_input_equals_direct_human_input() {
        // feeding the atomic form yields the same value as supplying the
        // human-scaled form directly
        let atomic = normalize_amount(dec("100000000000000000000"), 18);
        let human = normalize_amount(dec("100"), 18);
        assert_eq!(atomic, human);
    }

    #[test]
    fn negative_and_zero_normalize_to_zero() {
        assert_eq!(normalize_amount(dec("-42"), 18), Decimal::ZERO);
        assert_eq!(normalize_amount(Decimal::ZERO, 18), Decimal::ZERO);
    }

    #[test]
    fn zero_decimals() {
        // threshold is 100: small integers pass, huge ones divide by 10^0 = 1
        assert_eq!(normalize_amount(dec("99"), 0), dec("99"));
        assert_eq!(normalize_amount(dec("101"), 0), dec("101"));
    }

    #[test]
    fn oversized_decimals_disable_detection() {
        // 10^40 overflows Decimal; everything passes through unchanged
        assert_eq!(normalize_amount(dec("5000"), 40), dec("5000"));
    }

    #[test]
    fn precision_is_preserved_through_scaling() {
        // 1234567890123456789 raw / 10^18 — all 19 significant digits kept
        assert_eq!(
            normalize_amount(dec("1234567890123456789000"), 18),
            dec("1234.567890123456789")
        );
    }
}
