//! Utility functions for formatting report values

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::MONEY_DECIMAL_PLACES;

/// Format a monetary amount with exactly two decimal places
pub fn format_money(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    // 0 * negative yields a negatively signed zero
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.2}", rounded)
}

/// Left-align `value` in a column of at least `width` characters
pub fn pad_right(value: &str, width: usize) -> String {
    format!("{:<width$}", value, width = width)
}

/// Strip the `token` query parameter from a URL before it is logged
pub fn redact_token(url: &str) -> String {
    match url.find("token=") {
        Some(start) => {
            let value_start = start + "token=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|offset| value_start + offset)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}
