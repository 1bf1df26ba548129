// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, NaiveTime};

use crate::error::DateFormatError;

const HOUR: u64 = 3600;
const DAY: u64 = 24 * HOUR;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

/// Resolves a date expression to unix seconds.
///
/// Three forms are accepted:
///
/// * `now`, case-insensitive, which resolves to `now` as passed in;
/// * an absolute `YYYY-MM-DD`, taken at UTC midnight;
/// * a relative offset `-<count><unit>` subtracted from `now`, with
///   the nominal units `h`, `d`, `m` (30 days) and `y` (365 days).
///
/// The caller supplies the wall clock, so results are reproducible.
/// Offsets reaching past the unix epoch saturate at zero, as do
/// pre-epoch absolute dates.
pub fn parse_date(input: &str, now: u64) -> Result<u64, DateFormatError> {
    if input.eq_ignore_ascii_case("now") {
        return Ok(now);
    }
    if let Some(offset) = input.strip_prefix('-') {
        return parse_offset(input, offset, now);
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| DateFormatError { input: input.to_owned() })?;
    let seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    Ok(seconds.max(0) as u64)
}

fn parse_offset(input: &str, offset: &str, now: u64) -> Result<u64, DateFormatError> {
    let invalid = || DateFormatError { input: input.to_owned() };
    let unit = offset.chars().next_back().ok_or_else(invalid)?;
    let count: u64 = offset[..offset.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    let seconds = match unit {
        'h' => HOUR,
        'd' => DAY,
        'm' => MONTH,
        'y' => YEAR,
        _ => return Err(invalid()),
    };
    Ok(now.saturating_sub(count.saturating_mul(seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_750_000_000;

    #[test]
    fn now_is_case_insensitive() {
        assert_eq!(parse_date("now", NOW).unwrap(), NOW);
        assert_eq!(parse_date("NOW", NOW).unwrap(), NOW);
        assert_eq!(parse_date("Now", NOW).unwrap(), NOW);
    }

    #[test]
    fn absolute_dates_resolve_to_utc_midnight() {
        assert_eq!(parse_date("1970-01-01", NOW).unwrap(), 0);
        assert_eq!(parse_date("2024-01-01", NOW).unwrap(), 1_704_067_200);
        assert_eq!(parse_date("2024-01-31", NOW).unwrap(), 1_706_659_200);
    }

    #[test]
    fn pre_epoch_dates_saturate_at_zero() {
        assert_eq!(parse_date("1969-12-31", NOW).unwrap(), 0);
    }

    #[test]
    fn relative_offsets_use_nominal_units() {
        assert_eq!(parse_date("-12h", NOW).unwrap(), NOW - 12 * 3600);
        assert_eq!(parse_date("-30d", NOW).unwrap(), NOW - 30 * 86_400);
        assert_eq!(parse_date("-2m", NOW).unwrap(), NOW - 60 * 86_400);
        assert_eq!(parse_date("-1y", NOW).unwrap(), NOW - 365 * 86_400);
        assert_eq!(parse_date("-0d", NOW).unwrap(), NOW);
    }

    #[test]
    fn oversized_offsets_saturate_at_zero() {
        assert_eq!(parse_date("-60y", 1_000).unwrap(), 0);
        assert_eq!(parse_date("-18446744073709551615d", NOW).unwrap(), 0);
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        for input in ["", "-", "-5x", "-d", "--5d", "5d", "2024-13-40", "yesterday", "-5 d"] {
            let err = parse_date(input, NOW).unwrap_err();
            assert_eq!(err.input, input);
        }
    }
}
