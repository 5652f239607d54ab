use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::utils::hours::Hours;

static HOURS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*h(?:ou)?rs?").unwrap());
static MINUTES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*min").unwrap());
static SECONDS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*sec").unwrap());

/// Converts a free text duration like "1 hr 30 min" into hours. Never fails, anything that can't
/// be understood counts as zero.
pub fn parse_duration(value: &str) -> Hours {
    let value = value.trim();
    if value.is_empty() {
        return Hours::ZERO;
    }

    let hours = first_amount(&HOURS_REGEX, value);
    let minutes = first_amount(&MINUTES_REGEX, value);
    let seconds = first_amount(&SECONDS_REGEX, value);

    if hours.is_none() && minutes.is_none() && seconds.is_none() {
        warn!("Duration {value:?} has no known units, counting it as zero");
    }

    Hours::from_parts(
        hours.unwrap_or(0.),
        minutes.unwrap_or(0.),
        seconds.unwrap_or(0.),
    )
}

fn first_amount(regex: &Regex, value: &str) -> Option<f64> {
    regex
        .captures(value)
        .and_then(|v| v.get(1))
        .and_then(|v| v.as_str().parse::<f64>().ok())
}
