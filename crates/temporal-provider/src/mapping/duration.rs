// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Duration strings.
//!
//! Configuration uses Go-style duration strings (`90s`, `1h30m`, `1.5h`,
//! `300ms`) extended with a `d` unit for whole days, since the canonical
//! form written back to state uses it.

use std::time::Duration;

use thiserror::Error;

const NANOS_PER_SEC: u128 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration {input:?}: {reason}")]
pub struct ParseDurationError {
    pub input: String,
    pub reason: String,
}

impl ParseDurationError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        "d" => 86_400 * NANOS_PER_SEC,
        _ => return None,
    })
}

/// Parse a duration string such as `"1h30m"`, `"2.5s"` or `"7d"`.
///
/// Negative durations are rejected; none of the fields that take a duration
/// accept them.
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let mut s = input.trim();
    if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    } else if s.starts_with('-') {
        return Err(ParseDurationError::new(input, "negative durations are not allowed"));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(ParseDurationError::new(input, "empty duration"));
    }

    let mut total: u128 = 0;
    while !s.is_empty() {
        let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
        let int_part = &s[..int_len];
        s = &s[int_len..];

        let mut frac_part = "";
        if let Some(rest) = s.strip_prefix('.') {
            let frac_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            frac_part = &rest[..frac_len];
            s = &rest[frac_len..];
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDurationError::new(input, "expected a number"));
        }

        let unit_len = s
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '.')
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let unit = &s[..unit_len];
        s = &s[unit_len..];
        if unit.is_empty() {
            return Err(ParseDurationError::new(input, "missing unit"));
        }
        let scale = unit_nanos(unit)
            .ok_or_else(|| ParseDurationError::new(input, format!("unknown unit {:?}", unit)))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| ParseDurationError::new(input, "number out of range"))?
        };
        let mut value = whole
            .checked_mul(scale)
            .ok_or_else(|| ParseDurationError::new(input, "duration out of range"))?;

        // Fraction digits beyond nanosecond precision contribute nothing.
        let frac_part = &frac_part[..frac_part.len().min(18)];
        if !frac_part.is_empty() {
            let digits: u128 = frac_part
                .parse()
                .map_err(|_| ParseDurationError::new(input, "number out of range"))?;
            let denom = 10u128.pow(frac_part.len() as u32);
            value += digits * scale / denom;
        }

        total = total
            .checked_add(value)
            .ok_or_else(|| ParseDurationError::new(input, "duration out of range"))?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC)
        .map_err(|_| ParseDurationError::new(input, "duration out of range"))?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Short form for a whole number of seconds.
///
/// 86400, 3600, 1800 and 60 seconds are fixed as `24h`, `1h`, `30m` and
/// `1m`. Other values use the largest of days, hours or minutes that divides
/// them exactly, falling back to seconds. The fixed table wins over the day
/// rule, so one day is `24h` while two days are `2d`.
pub fn format_duration_canonical(seconds: i64) -> String {
    match seconds {
        86_400 => "24h".to_string(),
        3_600 => "1h".to_string(),
        1_800 => "30m".to_string(),
        60 => "1m".to_string(),
        s if s % 86_400 == 0 => format!("{}d", s / 86_400),
        s if s % 3_600 == 0 => format!("{}h", s / 3_600),
        s if s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{}s", s),
    }
}

/// Go `time.Duration` style rendering: `1h2m3s`, `1.5s`, `300ms`, `0s`.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_SEC {
        let (unit, scale) = if nanos < 1_000 {
            ("ns", 1)
        } else if nanos < 1_000_000 {
            ("µs", 1_000)
        } else {
            ("ms", 1_000_000)
        };
        return format!("{}{}", decimal(nanos, scale), unit);
    }

    let total_secs = d.as_secs();
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    let sub = seconds as u128 * NANOS_PER_SEC + d.subsec_nanos() as u128;
    out.push_str(&decimal(sub, NANOS_PER_SEC));
    out.push('s');
    out
}

fn decimal(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let rem = value % scale;
    if rem == 0 {
        return whole.to_string();
    }
    let width = scale.to_string().len() - 1;
    let digits = format!("{:0width$}", rem, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Render a wire duration for state.
///
/// Whole-second values use the canonical short form; anything with a
/// sub-second part keeps full precision.
pub fn format_proto_duration(d: &prost_types::Duration) -> String {
    if d.nanos == 0 {
        format_duration_canonical(d.seconds)
    } else {
        format_duration(Duration::new(d.seconds.max(0) as u64, d.nanos.max(0) as u32))
    }
}

/// Convert to the protobuf well-known type. `None` when the seconds do not
/// fit its signed field.
pub fn to_proto_duration(d: Duration) -> Option<prost_types::Duration> {
    let seconds = i64::try_from(d.as_secs()).ok()?;
    Some(prost_types::Duration {
        seconds,
        nanos: d.subsec_nanos() as i32,
    })
}

/// Parse a duration string straight into the protobuf well-known type.
pub fn parse_proto_duration(input: &str) -> Result<prost_types::Duration, ParseDurationError> {
    let d = parse_duration(input)?;
    to_proto_duration(d).ok_or_else(|| ParseDurationError::new(input, "duration out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proto_duration_rejects_seconds_beyond_i64() {
        // Fits in u64 seconds but not in the signed protobuf field.
        let err = parse_proto_duration("10000000000000000000s").unwrap_err();
        assert_eq!(err.reason, "duration out of range");
        assert!(to_proto_duration(Duration::from_secs(u64::MAX)).is_none());

        let max = Duration::from_secs(i64::MAX as u64);
        assert_eq!(to_proto_duration(max).map(|d| d.seconds), Some(i64::MAX));
        assert_eq!(
            parse_proto_duration("1.5s").unwrap(),
            prost_types::Duration {
                seconds: 1,
                nanos: 500_000_000
            }
        );
    }

    #[test]
    fn test_special_cases() {
        assert_eq!(format_duration_canonical(86_400), "24h");
        assert_eq!(format_duration_canonical(3_600), "1h");
        assert_eq!(format_duration_canonical(1_800), "30m");
        assert_eq!(format_duration_canonical(60), "1m");
    }

    #[test]
    fn test_generic_branches() {
        assert_eq!(format_duration_canonical(172_800), "2d");
        assert_eq!(format_duration_canonical(7_200), "2h");
        assert_eq!(format_duration_canonical(300), "5m");
        assert_eq!(format_duration_canonical(90), "90s");
        assert_eq!(format_duration_canonical(5_400), "90m");
        assert_eq!(format_duration_canonical(0), "0d");
    }

    #[test]
    fn test_canonical_round_trip() {
        let samples = [
            60, 120, 1_800, 3_600, 5_400, 7_200, 43_200, 86_400, 172_800, 604_800, 45, 3_601,
        ];
        for secs in samples {
            let rendered = format_duration_canonical(secs);
            let parsed = parse_duration(&rendered).unwrap();
            assert_eq!(parsed.as_secs() as i64, secs, "round trip of {}", rendered);
        }
    }

    #[test]
    fn test_parse_go_style() {
        assert_eq!(parse_duration("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("2h45m30s").unwrap(), Duration::from_secs(9_930));
        assert_eq!(parse_duration("10us").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("10µs").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("7d").unwrap(), Duration::from_secs(604_800));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("+5m").unwrap(), Duration::from_secs(300));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "5", "abc", "5x", "-5m", "1h-", "h"] {
            assert!(parse_duration(bad).is_err(), "{:?} should not parse", bad);
        }
        let err = parse_duration("5 minutes").unwrap_err();
        assert!(err.to_string().contains("5 minutes"));
    }

    #[test]
    fn test_format_go_style() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1.5s");
        assert_eq!(format_duration(Duration::from_millis(300)), "300ms");
        assert_eq!(format_duration(Duration::from_micros(2)), "2µs");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "1h0m0s");
    }

    #[test]
    fn test_format_proto_duration() {
        let whole = prost_types::Duration {
            seconds: 300,
            nanos: 0,
        };
        assert_eq!(format_proto_duration(&whole), "5m");

        let fractional = prost_types::Duration {
            seconds: 1,
            nanos: 500_000_000,
        };
        assert_eq!(format_proto_duration(&fractional), "1.5s");
        assert_eq!(
            parse_proto_duration(&format_proto_duration(&fractional)).unwrap(),
            fractional
        );
    }
}
