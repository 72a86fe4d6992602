use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// All ledger amounts carry two-decimal currency semantics: $12.34 = 1234 cents.
pub type Cents = i64;

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string into cents.
/// Accepts at most two decimal places; anything finer is not representable
/// as currency and is rejected rather than silently rounded.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    if digits.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }

    let cents = match digits.split_once('.') {
        None => {
            let units: i64 = digits.parse().map_err(|_| ParseCentsError::InvalidFormat)?;
            units
                .checked_mul(100)
                .ok_or(ParseCentsError::InvalidFormat)?
        }
        Some((units_str, decimal_str)) => {
            let units: i64 = if units_str.is_empty() {
                0
            } else {
                units_str
                    .parse()
                    .map_err(|_| ParseCentsError::InvalidFormat)?
            };
            let decimal: i64 = match decimal_str.len() {
                1 | 2 => decimal_str
                    .parse::<i64>()
                    .map_err(|_| ParseCentsError::InvalidFormat)
                    .and_then(|d| {
                        if d < 0 {
                            Err(ParseCentsError::InvalidFormat)
                        } else {
                            Ok(d)
                        }
                    })?,
                _ => return Err(ParseCentsError::InvalidFormat),
            };
            let decimal = if decimal_str.len() == 1 {
                decimal * 10
            } else {
                decimal
            };
            units
                .checked_mul(100)
                .and_then(|c| c.checked_add(decimal))
                .ok_or(ParseCentsError::InvalidFormat)?
        }
    };

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
