//! Discount applicability policy
//!
//! A discount is redeemable only while it is active, unexpired, has
//! remaining quantity, and the bill total reaches its minimum qualifying
//! price. Non-applicability is a policy verdict, not an error: callers get
//! a reason, nothing is thrown, and nothing is mutated here.

use crate::db::models::Discount;

/// Why a discount cannot be applied right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// `active == false`
    Inactive,
    /// `expiry_date` is in the past
    Expired,
    /// No redemptions left
    Exhausted,
    /// Bill total is below the minimum qualifying price
    BelowMinimum,
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Inactive => "Discount is not active",
            Self::Expired => "Discount has expired",
            Self::Exhausted => "Discount has no redemptions left",
            Self::BelowMinimum => "Bill total is below the discount minimum",
        }
    }
}

/// Policy verdict for one discount against one bill total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    Redeemable,
    NotApplicable(RejectReason),
}

impl Applicability {
    pub fn is_redeemable(&self) -> bool {
        matches!(self, Self::Redeemable)
    }
}

/// Evaluate whether `discount` can be redeemed against `bill_total` at
/// `now` (Unix millis). Pure read; quantity is decremented elsewhere, only
/// inside the settlement transaction.
pub fn evaluate(discount: &Discount, bill_total: f64, now: i64) -> Applicability {
    if !discount.active {
        return Applicability::NotApplicable(RejectReason::Inactive);
    }
    if discount.expiry_date < now {
        return Applicability::NotApplicable(RejectReason::Expired);
    }
    if discount.quantity <= 0 {
        return Applicability::NotApplicable(RejectReason::Exhausted);
    }
    if bill_total < discount.min_price {
        return Applicability::NotApplicable(RejectReason::BelowMinimum);
    }
    Applicability::Redeemable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DiscountKind;

    const NOW: i64 = 1_756_000_000_000;

    fn sample_discount() -> Discount {
        Discount {
            id: None,
            code: "SALE10".to_string(),
            kind: DiscountKind::Percentage,
            amount: 10.0,
            min_price: 50_000.0,
            quantity: 5,
            active: true,
            create_date: NOW - 86_400_000,
            expiry_date: NOW + 86_400_000,
        }
    }

    #[test]
    fn test_redeemable() {
        let d = sample_discount();
        assert_eq!(evaluate(&d, 100_000.0, NOW), Applicability::Redeemable);
    }

    #[test]
    fn test_inactive_rejected_first() {
        let mut d = sample_discount();
        d.active = false;
        d.quantity = 0;
        // Inactive takes precedence over exhaustion
        assert_eq!(
            evaluate(&d, 100_000.0, NOW),
            Applicability::NotApplicable(RejectReason::Inactive)
        );
    }

    #[test]
    fn test_expired() {
        let mut d = sample_discount();
        d.expiry_date = NOW - 1;
        assert_eq!(
            evaluate(&d, 100_000.0, NOW),
            Applicability::NotApplicable(RejectReason::Expired)
        );
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let mut d = sample_discount();
        d.expiry_date = NOW;
        assert_eq!(evaluate(&d, 100_000.0, NOW), Applicability::Redeemable);
    }

    #[test]
    fn test_exhausted() {
        let mut d = sample_discount();
        d.quantity = 0;
        assert_eq!(
            evaluate(&d, 100_000.0, NOW),
            Applicability::NotApplicable(RejectReason::Exhausted)
        );
    }

    #[test]
    fn test_below_minimum() {
        let d = sample_discount();
        assert_eq!(
            evaluate(&d, 49_999.99, NOW),
            Applicability::NotApplicable(RejectReason::BelowMinimum)
        );
        // Exactly at the minimum qualifies
        assert_eq!(evaluate(&d, 50_000.0, NOW), Applicability::Redeemable);
    }
}
