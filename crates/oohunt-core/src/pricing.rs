//! Price arithmetic shared by the adapter and the presentation layers.
//!
//! Prices are `f64` display values, not ledger amounts: every helper here
//! rounds half away from zero at the cent or whole-percent boundary.

/// Rounds a price to two decimal places.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole-number discount percentage of `current` against `original`.
///
/// Returns `0.0` when there is no original price or the product is not
/// actually cheaper than it.
#[must_use]
pub fn calculate_discount(original: f64, current: f64) -> f64 {
    if original <= 0.0 || current >= original {
        return 0.0;
    }
    ((original - current) / original * 100.0).round()
}

/// Reconstructs the pre-discount price from a selling price and a discount
/// percentage, rounded to cents.
///
/// Callers must keep `discount` below 100; the result is meaningless (or
/// infinite) otherwise.
#[must_use]
pub fn back_compute_original_price(price: f64, discount: f64) -> f64 {
    round_cents(price / (1.0 - discount / 100.0))
}

/// Formats an amount for display, e.g. `format_price(1234.5, "USD")` yields
/// `"$1,234.50"`.
///
/// Currencies without a known symbol are prefixed with their ISO code.
#[must_use]
pub fn format_price(amount: f64, currency: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = group_thousands(whole);
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };

    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{grouped}.{fraction}"),
        None => format!("{sign}{} {grouped}.{fraction}", currency.to_uppercase()),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "CNY" => Some("CN¥"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn calculate_discount_rounds_percentage() {
        assert!(approx(calculate_discount(100.0, 90.0), 10.0));
        assert!(approx(calculate_discount(30.0, 20.0), 33.0));
    }

    #[test]
    fn calculate_discount_zero_when_not_cheaper() {
        assert!(approx(calculate_discount(10.0, 10.0), 0.0));
        assert!(approx(calculate_discount(10.0, 12.0), 0.0));
        assert!(approx(calculate_discount(0.0, 5.0), 0.0));
    }

    #[test]
    fn back_compute_original_price_inverts_percentage() {
        assert!(approx(back_compute_original_price(80.0, 20.0), 100.0));
        assert!(approx(back_compute_original_price(19.99, 35.0), 30.75));
    }

    #[test]
    fn round_cents_keeps_two_decimals() {
        assert!(approx(round_cents(10.005_1), 10.01));
        assert!(approx(round_cents(3.0), 3.0));
    }

    #[test]
    fn format_price_groups_thousands() {
        assert_eq!(format_price(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_price(1_234_567.0, "usd"), "$1,234,567.00");
        assert_eq!(format_price(0.0, "USD"), "$0.00");
        assert_eq!(format_price(999.999, "USD"), "$1,000.00");
    }

    #[test]
    fn format_price_handles_other_currencies() {
        assert_eq!(format_price(12.0, "EUR"), "€12.00");
        assert_eq!(format_price(12.0, "CHF"), "CHF 12.00");
        assert_eq!(format_price(-5.0, "USD"), "-$5.00");
    }
}
