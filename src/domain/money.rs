use std::fmt;

/// Amounts are integer cents; floats never touch money.
/// 1 unit = 100 cents, so 42.50 is stored as 4250.
pub type Cents = i64;

/// Render cents as a plain decimal string: 4250 -> "42.50", -7 -> "-0.07".
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, cents.abs() / 100, cents.abs() % 100)
}

/// Parse a decimal amount string into cents.
/// Accepts "42", "42.5", "42.50"; extra fractional digits are truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if digits.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }

    let (whole, frac) = match digits.find('.') {
        Some(pos) => (&digits[..pos], &digits[pos + 1..]),
        None => (digits, ""),
    };
    // The fraction must be plain ASCII digits before any slicing below.
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ParseCentsError::InvalidFormat)?
    };

    // Normalize the fraction to exactly two digits.
    let frac_cents: i64 = match frac.len() {
        0 => 0,
        1 => {
            frac.parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        _ => frac[..2].parse().map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units * 100 + frac_cents;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(4250), "42.50");
        assert_eq!(format_cents(100), "1.00");
        assert_eq!(format_cents(7), "0.07");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-4250), "-42.50");
        assert_eq!(format_cents(-7), "-0.07");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("42.50"), Ok(4250));
        assert_eq!(parse_cents("42"), Ok(4200));
        assert_eq!(parse_cents("42.5"), Ok(4250));
        assert_eq!(parse_cents("0.07"), Ok(7));
        assert_eq!(parse_cents(".25"), Ok(25));
        assert_eq!(parse_cents("-12.34"), Ok(-1234));
        assert_eq!(parse_cents("9.999"), Ok(999)); // truncates
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("").is_err());
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("1.2.3").is_err());
        assert!(parse_cents("-").is_err());
    }

    #[test]
    fn test_parse_cents_multibyte_fraction_is_error() {
        assert_eq!(parse_cents("1.€€"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1.2€"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("42.５0"), Err(ParseCentsError::InvalidFormat));
    }
}
