//! Decimal amounts and lenient numeric form input.

use rust_decimal::Decimal;

/// Coerce free-form numeric input into a decimal amount.
///
/// Form fields hold whatever the user typed. Anything that does not parse
/// as a number (including an empty field) becomes zero.
///
/// ```
/// use rust_decimal::Decimal;
/// use vendor_desk_core::coerce_decimal;
///
/// assert_eq!(coerce_decimal("12.50"), Decimal::new(1250, 2));
/// assert_eq!(coerce_decimal(" 3 "), Decimal::from(3));
/// assert_eq!(coerce_decimal("abc"), Decimal::ZERO);
/// assert_eq!(coerce_decimal(""), Decimal::ZERO);
/// ```
#[must_use]
pub fn coerce_decimal(input: &str) -> Decimal {
    let trimmed = input.trim();
    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Coerce free-form integer input, defaulting to zero.
#[must_use]
pub fn coerce_u32(input: &str) -> u32 {
    input.trim().parse().unwrap_or(0)
}

/// Format an amount with two decimal places and a currency symbol.
#[must_use]
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    format!("{symbol}{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_decimal_negative_and_scientific() {
        assert_eq!(coerce_decimal("-4.5"), Decimal::new(-45, 1));
        assert_eq!(coerce_decimal("1e2"), Decimal::from(100));
    }

    #[test]
    fn test_coerce_u32_defaults_to_zero() {
        assert_eq!(coerce_u32("42"), 42);
        assert_eq!(coerce_u32("-1"), 0);
        assert_eq!(coerce_u32("four"), 0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(19_999, 3), "$"), "$20.00");
        assert_eq!(format_amount(Decimal::ZERO, "€"), "€0.00");
    }
}
