//! Discount coupons.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Validate, ValidationError, require};
use super::id::CouponId;
use super::money::{coerce_decimal, coerce_u32};

/// How a coupon's amount is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    #[default]
    Percentage,
    FixedCart,
    FixedProduct,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CouponId>,
    pub code: String,
    #[serde(default)]
    pub kind: DiscountKind,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub minimum_spend: Option<Decimal>,
    /// Zero means unlimited.
    #[serde(default)]
    pub usage_limit: u32,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
}

impl Coupon {
    /// Codes are stored upper-case without surrounding whitespace.
    pub fn set_code_input(&mut self, input: &str) {
        self.code = input.trim().to_uppercase();
    }

    pub fn set_amount_input(&mut self, input: &str) {
        self.amount = coerce_decimal(input);
    }

    pub fn set_usage_limit_input(&mut self, input: &str) {
        self.usage_limit = coerce_u32(input);
    }

    /// Whether the coupon can still be redeemed on `today`.
    #[must_use]
    pub fn is_redeemable(&self, today: NaiveDate) -> bool {
        let within_limit = self.usage_limit == 0 || self.usage_count < self.usage_limit;
        let not_expired = self.expires_on.is_none_or(|d| today <= d);
        within_limit && not_expired
    }
}

impl Entity for Coupon {
    type Id = CouponId;

    fn id(&self) -> Option<&CouponId> {
        self.id.as_ref()
    }
}

impl Validate for Coupon {
    fn validate(&self) -> Result<(), ValidationError> {
        require("code", &self.code)?;
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::invalid("amount", "must be greater than zero"));
        }
        if self.kind == DiscountKind::Percentage && self.amount > Decimal::ONE_HUNDRED {
            return Err(ValidationError::invalid("amount", "cannot exceed 100%"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_amount_rules() {
        let mut coupon = Coupon::default();
        coupon.set_code_input(" summer10 ");
        assert_eq!(coupon.code, "SUMMER10");

        coupon.set_amount_input("ten");
        assert_eq!(coupon.validate().map_err(|e| e.field()), Err("amount"));

        coupon.set_amount_input("150");
        assert!(coupon.validate().is_err());

        coupon.kind = DiscountKind::FixedCart;
        assert!(coupon.validate().is_ok());
    }

    #[test]
    fn test_redeemable_window() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut coupon = Coupon {
            code: "X".to_string(),
            amount: Decimal::TEN,
            usage_limit: 2,
            usage_count: 1,
            expires_on: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..Coupon::default()
        };
        assert!(coupon.is_redeemable(today));
        coupon.usage_count = 2;
        assert!(!coupon.is_redeemable(today));
        coupon.usage_limit = 0;
        assert!(!coupon.is_redeemable(today.succ_opt().unwrap()));
    }
}
