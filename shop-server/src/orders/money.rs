//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `f64`; sums are computed with `Decimal` and rounded
//! to 2 decimal places (half away from zero) before being stored again.

use rust_decimal::prelude::*;

/// Rounding for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal (NaN and infinities become zero)
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to a rounded f64
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `unit_price × quantity`
pub fn line_total(unit_price: f64, quantity: i64) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// Whether a price can be sold at (finite and strictly positive)
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_has_no_float_drift() {
        // 0.1 * 3 + 0.2 * 3 is 0.9000000000000001 in plain f64
        let total = line_total(0.1, 3) + line_total(0.2, 3);
        assert_eq!(to_f64(total), 0.9);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(19999, 2)), 199.99);
        assert_eq!(to_f64(line_total(19.99, 3)), 59.97);
    }

    #[test]
    fn test_price_validity() {
        assert!(is_valid_price(0.01));
        assert!(!is_valid_price(0.0));
        assert!(!is_valid_price(-3.0));
        assert!(!is_valid_price(f64::NAN));
        assert!(!is_valid_price(f64::INFINITY));
    }
}
