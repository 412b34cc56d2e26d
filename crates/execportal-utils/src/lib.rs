//! Formatting helpers for statement tables and metric charts

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Insert `separator` between groups of three integer digits, keeping
/// the sign and any fractional part untouched.
pub fn group_thousands(s: &str, separator: &str) -> String {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut reversed = String::new();
    for (count, c) in int_part.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            reversed.extend(separator.chars().rev());
        }
        reversed.push(c);
    }

    let mut result = String::from(sign);
    result.extend(reversed.chars().rev());
    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }
    result
}

fn rounded(value: Decimal, decimal_places: u32) -> Decimal {
    let value = value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    if value.is_zero() {
        Decimal::ZERO
    } else {
        value
    }
}

fn fixed(value: Decimal, decimal_places: u32, separator: &str) -> String {
    let text = format!("{:.*}", decimal_places as usize, value);
    group_thousands(&text, separator)
}

/// Currency display, e.g. `-$1,234.50`
pub fn format_currency(value: Decimal, symbol: &str, decimal_places: u32, separator: &str) -> String {
    let value = rounded(value, decimal_places);
    let body = fixed(value.abs(), decimal_places, separator);
    if value.is_sign_negative() {
        format!("-{}{}", symbol, body)
    } else {
        format!("{}{}", symbol, body)
    }
}

/// Accounting display: negatives are wrapped in parentheses, e.g. `($1,234.50)`
pub fn format_accounting(value: Decimal, symbol: &str, decimal_places: u32, separator: &str) -> String {
    let value = rounded(value, decimal_places);
    let body = fixed(value.abs(), decimal_places, separator);
    if value.is_sign_negative() {
        format!("({}{})", symbol, body)
    } else {
        format!("{}{}", symbol, body)
    }
}

/// Percent display of a ratio, e.g. `0.4235` -> `42.35%`
pub fn format_percent(ratio: Decimal, decimal_places: u32) -> String {
    let value = rounded(ratio * Decimal::ONE_HUNDRED, decimal_places);
    format!("{}%", fixed(value, decimal_places, ","))
}

/// Column label for a period, e.g. `Jan 2024`
pub fn month_label(period: NaiveDate) -> String {
    period.format("%b %Y").to_string()
}

/// Selector label for a period, e.g. `January 2024`
pub fn long_month_label(period: NaiveDate) -> String {
    period.format("%B %Y").to_string()
}

/// Badge label for a day, e.g. `March 1, 2024`
pub fn day_label(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1234567", ","), "1,234,567");
        assert_eq!(group_thousands("-1234.5", ","), "-1,234.5");
        assert_eq!(group_thousands("999", ","), "999");
    }

    #[test]
    fn test_group_thousands_custom_separator() {
        assert_eq!(group_thousands("1234567.89", " "), "1 234 567.89");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(1234.5), "$", 2, ","), "$1,234.50");
        assert_eq!(format_currency(dec!(-1234.5), "$", 0, ","), "-$1,235");
        assert_eq!(format_currency(dec!(-0.001), "$", 2, ","), "$0.00");
    }

    #[test]
    fn test_format_accounting() {
        assert_eq!(format_accounting(dec!(150), "$", 2, ","), "$150.00");
        assert_eq!(format_accounting(dec!(-20500.255), "$", 2, ","), "($20,500.26)");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(0.4235), 2), "42.35%");
        assert_eq!(format_percent(dec!(0.4235), 0), "42%");
    }

    #[test]
    fn test_period_labels() {
        let period = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(month_label(period), "Mar 2024");
        assert_eq!(long_month_label(period), "March 2024");
        assert_eq!(day_label(period), "March 1, 2024");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("R&D <script>"), "R&amp;D &lt;script&gt;");
    }
}
