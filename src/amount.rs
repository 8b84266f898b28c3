//! Amount normalization.
//!
//! Both `1.234,56` and `1,234.56` resolve to `1234.56` without knowing the
//! locale: commas become dots and only the rightmost dot survives as the
//! decimal point.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a monetary amount. Unparseable input, including trailing-sign
/// spellings such as `50.00-`, yields zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use statement_normalizer::amount::parse_amount;
///
/// assert_eq!(parse_amount("1.234,56"), Decimal::new(123456, 2));
/// assert_eq!(parse_amount("£ 1,234.56"), Decimal::new(123456, 2));
/// assert_eq!(parse_amount("n/a"), Decimal::ZERO);
/// ```
pub fn parse_amount(raw: &str) -> Decimal {
    Decimal::from_str(&clean_amount(raw)).unwrap_or(Decimal::ZERO)
}

/// Reduce an amount to `-?digits(.digits)?` form, or an empty string.
fn clean_amount(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    // Collapse thousands separators: keep only the last dot.
    let mut cleaned = match kept.rfind('.') {
        Some(last) if kept.matches('.').count() > 1 => {
            let (head, tail) = kept.split_at(last);
            let mut s = head.replace('.', "");
            s.push_str(tail);
            s
        }
        _ => kept,
    };

    if cleaned.starts_with('.') {
        cleaned.insert(0, '0');
    }

    strip_leading_zeros(&cleaned)
}

/// Drop redundant leading zeros, keeping a sign and a single zero before the point.
fn strip_leading_zeros(s: &str) -> String {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };

    let trimmed = digits.trim_start_matches('0');
    let body = if trimmed.is_empty() || trimmed.starts_with('.') {
        if digits.is_empty() {
            String::new()
        } else {
            format!("0{}", trimmed)
        }
    } else {
        trimmed.to_string()
    };

    format!("{}{}", sign, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_comma_and_dot_locales() {
        assert_eq!(parse_amount("1,234.56"), dec("1234.56"));
        assert_eq!(parse_amount("1.234,56"), dec("1234.56"));
        assert_eq!(parse_amount("1 540,00"), dec("1540.00"));
        assert_eq!(parse_amount("1.234.567,89"), dec("1234567.89"));
    }

    #[test]
    fn test_currency_symbols_and_text() {
        assert_eq!(parse_amount("$99.99"), dec("99.99"));
        assert_eq!(parse_amount("EUR 12,50"), dec("12.50"));
        assert_eq!(parse_amount("(75.25)"), dec("75.25"));
    }

    #[test]
    fn test_signs_and_leading_zeros() {
        assert_eq!(parse_amount("-0.50"), dec("-0.50"));
        assert_eq!(parse_amount(".5"), dec("0.5"));
        assert_eq!(parse_amount("007.10"), dec("7.10"));
        assert_eq!(parse_amount("-,75"), dec("-0.75"));
        assert_eq!(parse_amount("000"), Decimal::ZERO);
    }

    #[test]
    fn test_unparseable_is_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("-"), Decimal::ZERO);
        assert_eq!(parse_amount("12-34"), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        // Trailing-sign debits are not recognised.
        assert_eq!(parse_amount("50.00-"), Decimal::ZERO);
    }

    #[test]
    fn test_clean_amount() {
        assert_eq!(clean_amount("1,234.56"), "1234.56");
        assert_eq!(clean_amount("-0.50"), "-0.50");
        assert_eq!(clean_amount(""), "");
        assert_eq!(clean_amount("0"), "0");
    }
}
