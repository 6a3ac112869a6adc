//! Money calculation utilities using rust_decimal for precision
//!
//! All price math runs through `Decimal` and rounds to 2 decimal places
//! (half-up) before converting back to `f64` for storage/serialization.
//! Unit prices are snapshotted once at settlement time and never re-derived
//! from the product afterwards.

use rust_decimal::prelude::*;

use crate::db::models::DiscountKind;

/// Rounding precision for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed quantity per order line, enforced again after
/// repeated products are merged into one line
pub const MAX_LINE_QUANTITY: i64 = 9_999;

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

fn round_money(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Unit price snapshot: `price - price * discount_percent / 100`
pub fn unit_price_after_discount(price: f64, discount_percent: f64) -> f64 {
    let price = to_decimal(price);
    let percent = to_decimal(discount_percent);
    round_money(price - (price * percent) / Decimal::ONE_HUNDRED)
}

/// Total for one order line
pub fn line_total(unit_price: f64, quantity: i64) -> f64 {
    round_money(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Order total: sum of `(unit_price, quantity)` line totals
pub fn order_total<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, i64)>,
{
    let sum = lines
        .into_iter()
        .fold(Decimal::ZERO, |acc, (unit_price, quantity)| {
            acc + to_decimal(unit_price) * Decimal::from(quantity)
        });
    round_money(sum)
}

/// Sum of already-rounded line totals
pub fn total_of<I>(line_totals: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let sum = line_totals
        .into_iter()
        .fold(Decimal::ZERO, |acc, line| acc + to_decimal(line));
    round_money(sum)
}

/// Subtotal minus a reduction, floored at zero
pub fn after_reduction(subtotal: f64, reduction: f64) -> f64 {
    let result = to_decimal(subtotal) - to_decimal(reduction);
    round_money(result.max(Decimal::ZERO))
}

/// How much a redeemed code takes off a subtotal.
///
/// Percentage codes cut a fraction of the bill, fixed codes cut a flat
/// amount. The reduction is clamped to the subtotal so totals never go
/// negative.
pub fn discount_reduction(subtotal: f64, kind: DiscountKind, amount: f64) -> f64 {
    let subtotal = to_decimal(subtotal);
    let cut = match kind {
        DiscountKind::Percentage => subtotal * to_decimal(amount) / Decimal::ONE_HUNDRED,
        DiscountKind::FixedAmount => to_decimal(amount),
    };
    round_money(cut.clamp(Decimal::ZERO, subtotal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_price_percent_discount() {
        assert_eq!(unit_price_after_discount(100_000.0, 10.0), 90_000.0);
        assert_eq!(unit_price_after_discount(100_000.0, 0.0), 100_000.0);
        assert_eq!(unit_price_after_discount(100_000.0, 100.0), 0.0);
    }

    #[test]
    fn test_unit_price_rounds_half_up() {
        // 99.99 * 15% = 14.9985 -> 99.99 - 14.9985 = 84.9915 -> 84.99
        assert_eq!(unit_price_after_discount(99.99, 15.0), 84.99);
        // 10.00 * 12.5% = 1.25 -> 8.75
        assert_eq!(unit_price_after_discount(10.0, 12.5), 8.75);
        // 0.10 * 33% = 0.033 -> 0.067 rounds to 0.07
        assert_eq!(unit_price_after_discount(0.10, 33.0), 0.07);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(90_000.0, 2), 180_000.0);
        assert_eq!(line_total(84.99, 3), 254.97);
    }

    #[test]
    fn test_order_total_sums_lines() {
        let total = order_total(vec![(90_000.0, 2), (5_000.0, 1)]);
        assert_eq!(total, 185_000.0);
        assert_eq!(order_total(Vec::<(f64, i64)>::new()), 0.0);
    }

    #[test]
    fn test_float_noise_stays_out() {
        // Classic f64 trap: 0.1 + 0.2
        let total = order_total(vec![(0.1, 1), (0.2, 1)]);
        assert_eq!(total, 0.3);
    }

    #[test]
    fn test_total_of_line_totals() {
        assert_eq!(total_of(vec![180_000.0, 5_000.0]), 185_000.0);
        assert_eq!(total_of(vec![0.1, 0.2]), 0.3);
        assert_eq!(total_of(Vec::new()), 0.0);
    }

    #[test]
    fn test_after_reduction_floors_at_zero() {
        assert_eq!(after_reduction(180_000.0, 18_000.0), 162_000.0);
        assert_eq!(after_reduction(84.99, 3.74), 81.25);
        assert_eq!(after_reduction(10.0, 25.0), 0.0);
    }

    #[test]
    fn test_percentage_code_reduction() {
        assert_eq!(discount_reduction(180_000.0, DiscountKind::Percentage, 10.0), 18_000.0);
        assert_eq!(discount_reduction(99.99, DiscountKind::Percentage, 50.0), 50.0);
    }

    #[test]
    fn test_fixed_code_reduction_clamps_to_subtotal() {
        assert_eq!(discount_reduction(180_000.0, DiscountKind::FixedAmount, 5_000.0), 5_000.0);
        assert_eq!(discount_reduction(3_000.0, DiscountKind::FixedAmount, 5_000.0), 3_000.0);
        assert_eq!(discount_reduction(0.0, DiscountKind::FixedAmount, 5_000.0), 0.0);
    }
}
