//! Parsing of human duration strings such as `"300ms"`, `"5m"` or `"1h30m"`.
//!
//! The accepted grammar is a possibly signed sequence of decimal numbers,
//! each with an optional fraction and a mandatory unit suffix. Valid units
//! are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. The bare string `"0"`
//! is also accepted.

use std::time::Duration;

use thiserror::Error;

/// Reasons a duration string can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    /// The input was empty.
    #[error("empty duration")]
    Empty,
    /// The input did not follow the `<number><unit>...` grammar.
    #[error("invalid duration syntax")]
    Invalid,
    /// A number was not followed by a unit.
    #[error("missing unit in duration")]
    MissingUnit,
    /// The unit suffix is not one of the known units.
    #[error("unknown unit '{0}' in duration")]
    UnknownUnit(String),
    /// Negative durations cannot be represented.
    #[error("negative durations are not supported")]
    Negative,
    /// The value does not fit in 64-bit nanoseconds.
    #[error("duration out of range")]
    Overflow,
}

const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 60 * 60 * 1_000_000_000,
        _ => return None,
    };
    Some(nanos)
}

/// Parse a duration string.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let mut rest = input.trim();
    if rest.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let negative = rest.starts_with('-');
    if let Some(stripped) = rest.strip_prefix(['-', '+']) {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationParseError::Invalid);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let int_part = &rest[..int_end];
        rest = &rest[int_end..];

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_end = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            frac_part = &after_dot[..frac_end];
            rest = &after_dot[frac_end..];
        }

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(DurationParseError::Invalid);
        }

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        if unit.is_empty() {
            return Err(DurationParseError::MissingUnit);
        }
        let scale =
            unit_nanos(unit).ok_or_else(|| DurationParseError::UnknownUnit(unit.to_string()))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| DurationParseError::Overflow)?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or(DurationParseError::Overflow)?;

        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
            let fraction: u128 = digits.parse().map_err(|_| DurationParseError::Invalid)?;
            let denominator = 10u128.pow(digits.len() as u32);
            nanos += fraction * scale / denominator;
        }

        total = total
            .checked_add(nanos)
            .ok_or(DurationParseError::Overflow)?;
    }

    if total > u128::from(u64::MAX) {
        return Err(DurationParseError::Overflow);
    }
    if negative && total > 0 {
        return Err(DurationParseError::Negative);
    }

    Ok(Duration::from_nanos(total as u64))
}
