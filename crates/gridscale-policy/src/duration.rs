//! Duration literal parsing.
//!
//! Policy documents write cadences as literals like `"30s"`, `"10m"`,
//! `"1h30m"`. Parsing is strict: a literal that isn't a sequence of
//! `<number><unit>` segments is an error, never silently defaulted —
//! the decoder reports it against the offending attribute.

use std::time::Duration;

use thiserror::Error;

/// Why a duration literal failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("missing unit after \"{0}\"")]
    MissingUnit(String),

    #[error("unknown unit \"{0}\"")]
    UnknownUnit(String),

    #[error("invalid number \"{0}\"")]
    InvalidNumber(String),
}

/// Parse a duration literal.
///
/// Supported units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. Segments may be
/// fractional (`"1.5m"`) and compound (`"1h30m"`). The whole input must be
/// consumed.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        let (number, after) = rest.split_at(number_end);
        if number.is_empty() {
            // Unit with no leading number, e.g. "m" or "10mm" leftovers.
            return Err(DurationError::InvalidNumber(after.to_string()));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| DurationError::InvalidNumber(number.to_string()))?;

        let unit_end = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, next) = after.split_at(unit_end);
        let unit_secs = match unit {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            "" => return Err(DurationError::MissingUnit(number.to_string())),
            other => return Err(DurationError::UnknownUnit(other.to_string())),
        };

        total += Duration::from_secs_f64(value * unit_secs);
        rest = next;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_units() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn compound_literals() {
        assert_eq!(
            parse_duration("1h30m").unwrap(),
            Duration::from_secs(90 * 60)
        );
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn fractional_segments() {
        assert_eq!(parse_duration("1.5m").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("0.5s").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert_eq!(parse_duration(" 10m ").unwrap(), Duration::from_secs(600));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert_eq!(parse_duration("   "), Err(DurationError::Empty));
    }

    #[test]
    fn rejects_bare_number() {
        assert_eq!(
            parse_duration("10"),
            Err(DurationError::MissingUnit("10".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_unit() {
        assert_eq!(
            parse_duration("10x"),
            Err(DurationError::UnknownUnit("x".to_string()))
        );
        assert_eq!(
            parse_duration("10 minutes"),
            Err(DurationError::UnknownUnit(" minutes".to_string()))
        );
    }

    #[test]
    fn rejects_unit_without_number() {
        assert!(matches!(
            parse_duration("m"),
            Err(DurationError::InvalidNumber(_))
        ));
    }

    #[test]
    fn rejects_malformed_number() {
        assert_eq!(
            parse_duration("1..5s"),
            Err(DurationError::InvalidNumber("1..5".to_string()))
        );
    }
}
