//! Display formatting for result values.

/// Formats `value` with `decimals` fraction digits and `,` thousands separators.
pub fn grouped(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    // inf / NaN 不做分組
    if !integer.bytes().all(|b| b.is_ascii_digit()) {
        return fixed;
    }

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3);
    out.push_str(sign);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Reads back the numeric part of a display string such as `"1,234 bps"`.
pub fn parse_display(display: &str) -> Option<f64> {
    let number = display.split_whitespace().next()?;
    number.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_integers() {
        assert_eq!(grouped(0.0, 0), "0");
        assert_eq!(grouped(999.0, 0), "999");
        assert_eq!(grouped(1000.0, 0), "1,000");
        assert_eq!(grouped(1234567.0, 0), "1,234,567");
        assert_eq!(grouped(-64000.0, 0), "-64,000");
    }

    #[test]
    fn test_grouped_with_fraction() {
        assert_eq!(grouped(1234.5678, 2), "1,234.57");
        assert_eq!(grouped(3.849, 0), "4");
    }

    #[test]
    fn test_grouped_non_finite() {
        assert_eq!(grouped(f64::INFINITY, 0), "inf");
    }

    #[test]
    fn test_parse_display() {
        assert_eq!(parse_display("1,234,567 bps"), Some(1234567.0));
        assert_eq!(parse_display("-70.04 dBm"), Some(-70.04));
        assert_eq!(parse_display("Yes"), None);
    }
}
