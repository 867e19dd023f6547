//! Human interval grammar: `<number><unit>` tokens such as `3h` or `1d 12h`

use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::config::{MAX_INTERVAL_TICKS, TICK_MILLIS};
use crate::error::ConfigurationError;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(ms|mo|wk|s|m|h|d|y)").unwrap());

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

fn unit_millis(unit: &str) -> f64 {
    match unit {
        "ms" => 1.0,
        "s" => SECOND,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        "wk" => 7.0 * DAY,
        "mo" => 30.0 * DAY,
        "y" => 365.0 * DAY,
        _ => unreachable!("unit is constrained by TOKEN_RE"),
    }
}

/// Check interval measured in scheduler ticks of [`TICK_MILLIS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    ticks: u64,
}

impl Interval {
    /// Accepts 1..=[`MAX_INTERVAL_TICKS`] ticks
    pub fn from_ticks(ticks: u64) -> Result<Self, ConfigurationError> {
        if ticks == 0 {
            return Err(ConfigurationError::NonPositiveInterval);
        }
        if ticks > MAX_INTERVAL_TICKS {
            return Err(ConfigurationError::InvalidInterval(format!("{} ticks", ticks)));
        }
        Ok(Self { ticks })
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.ticks.saturating_mul(TICK_MILLIS))
    }
}

impl FromStr for Interval {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ticks(parse_interval(s)?)
    }
}

/// Convert an interval string into ticks.
///
/// Tokens may be separated by whitespace and are summed, so `1h 30m` equals
/// `90m`. Anything other than tokens and whitespace is rejected.
pub fn parse_interval(input: &str) -> Result<u64, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidInterval(input.to_string());
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(invalid());
    }

    let mut consumed = 0;
    let mut millis = 0.0;

    for captures in TOKEN_RE.captures_iter(trimmed) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        if !trimmed[consumed..whole.start()].trim().is_empty() {
            return Err(invalid());
        }

        let amount: f64 = captures[1].parse().map_err(|_| invalid())?;
        millis += amount * unit_millis(&captures[2]);
        consumed = whole.end();
    }

    if consumed == 0 || !trimmed[consumed..].trim().is_empty() {
        return Err(invalid());
    }

    let ticks = (millis / TICK_MILLIS as f64).round();
    if ticks > MAX_INTERVAL_TICKS as f64 {
        return Err(invalid());
    }

    let ticks = ticks as u64;
    if ticks == 0 {
        return Err(ConfigurationError::NonPositiveInterval);
    }

    Ok(ticks)
}
