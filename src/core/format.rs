//! Rounding and en-PH display shared by every exporter.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Round a peso amount to centavos.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// Peso amount with thousands separators, e.g. `₱1,250,000.00`.
pub fn format_php(amount: Decimal) -> String {
    let rounded = round2(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!(
        "{sign}₱{}",
        format_num::format_num!(",.2", rounded.abs().to_f64().unwrap_or_default())
    )
}

/// Rate as a whole percentage, e.g. `8%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.0}%", rate * dec!(100))
}

/// Long date as shown in en-PH, e.g. `April 25, 2025`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Month and day only, e.g. `April 25`.
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}
