//! Pricing and discount resolution.
//!
//! Single source of truth for "what price does the customer see and pay".
//! Every caller (catalog listings, order creation, cart totals, PC-build
//! quotes, bulk discount application) goes through these functions rather
//! than reading `discount_price` directly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// The price actually charged: discount price if set, else list price.
pub fn effective_price(price: Decimal, discount_price: Option<Decimal>) -> Decimal {
    discount_price.unwrap_or(price)
}

/// Percentage off for display, rounded to the nearest whole percent.
/// Returns 0 when no discount is set or the list price is not positive.
pub fn discount_percent(price: Decimal, discount_price: Option<Decimal>) -> u32 {
    match discount_price {
        Some(discount) if price > Decimal::ZERO => {
            let pct = (price - discount) / price * Decimal::from(100);
            pct.round().to_u32().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Whether a discount percentage is acceptable for bulk application.
/// The bounds are exclusive: 0% is a no-op and 100% would zero the price.
pub fn is_valid_discount_percent(pct: Decimal) -> bool {
    pct > Decimal::ZERO && pct < Decimal::from(100)
}

/// Compute a discounted price from the current list price. Always derived
/// from `price`, never from a previously discounted value, so re-applying
/// with a different percentage replaces rather than compounds.
pub fn apply_percentage(price: Decimal, pct: Decimal) -> Decimal {
    let factor = Decimal::ONE - pct / Decimal::from(100);
    (price * factor).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn effective_price_prefers_discount() {
        assert_eq!(effective_price(dec("1000"), Some(dec("800"))), dec("800"));
        assert_eq!(effective_price(dec("1000"), None), dec("1000"));
    }

    #[test]
    fn effective_price_never_exceeds_list_when_discounted() {
        let price = dec("1500.50");
        let discount = dec("1200.25");
        assert!(effective_price(price, Some(discount)) <= price);
    }

    #[test]
    fn discount_percent_rounds() {
        assert_eq!(discount_percent(dec("1000"), Some(dec("800"))), 20);
        assert_eq!(discount_percent(dec("3000"), Some(dec("2000"))), 33);
        assert_eq!(discount_percent(dec("1000"), None), 0);
        assert_eq!(discount_percent(Decimal::ZERO, Some(dec("1"))), 0);
    }

    #[test]
    fn percentage_bounds_are_exclusive() {
        assert!(!is_valid_discount_percent(Decimal::ZERO));
        assert!(!is_valid_discount_percent(dec("100")));
        assert!(!is_valid_discount_percent(dec("-5")));
        assert!(is_valid_discount_percent(dec("0.5")));
        assert!(is_valid_discount_percent(dec("99.9")));
    }

    #[test]
    fn apply_percentage_from_list_price() {
        assert_eq!(apply_percentage(dec("1000"), dec("20")), dec("800.00"));
        // Re-applying a different percentage starts from the list price again
        assert_eq!(apply_percentage(dec("1000"), dec("10")), dec("900.00"));
    }

    #[test]
    fn apply_percentage_rounds_to_paisa() {
        assert_eq!(apply_percentage(dec("999"), dec("33")), dec("669.33"));
    }
}
