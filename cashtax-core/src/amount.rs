//! CashApp money strings: `$50.00`, `-$1,234.56`, or empty.

use anyhow::{Context, Result};

/// Parse a CashApp amount. Empty input is zero; anything else must be a
/// decimal once `$` and `,` are removed.
pub fn parse_amount(raw: &str) -> Result<f64> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid amount '{raw}'"))
}

/// Render a magnitude as a plain decimal: shortest round-trip digits, never
/// exponent notation, always with a fractional part (`50.0`, `0.5`,
/// `0.00002`).
pub fn format_amount(value: f64) -> String {
    let s = value.to_string();
    if value.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}

/// `|parse_amount(raw)|`, formatted.
pub fn magnitude(raw: &str) -> Result<String> {
    Ok(format_amount(parse_amount(raw)?.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(parse_amount("").unwrap(), 0.0);
    }

    #[test]
    fn test_dollar_and_separators() {
        assert_eq!(parse_amount("$50.00").unwrap(), 50.0);
        assert_eq!(parse_amount("-$1,234.56").unwrap(), -1234.56);
        assert_eq!(parse_amount("12").unwrap(), 12.0);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let err = parse_amount("$abc").unwrap_err();
        assert!(err.to_string().contains("$abc"));
        assert!(parse_amount("-").is_err());
    }

    #[test]
    fn test_format_keeps_fraction() {
        assert_eq!(format_amount(50.0), "50.0");
        assert_eq!(format_amount(0.5), "0.5");
        assert_eq!(format_amount(1234.56), "1234.56");
        assert_eq!(format_amount(0.0), "0.0");
    }

    #[test]
    fn test_format_never_uses_exponent() {
        assert_eq!(format_amount(0.00002), "0.00002");
        assert_eq!(format_amount(1e16), "10000000000000000.0");
    }

    #[test]
    fn test_magnitude_drops_sign() {
        assert_eq!(magnitude("-$50.00").unwrap(), "50.0");
        assert_eq!(magnitude("").unwrap(), "0.0");
        // -0.0 must not leak a sign into the output
        assert_eq!(magnitude("-$0.00").unwrap(), "0.0");
    }
}
