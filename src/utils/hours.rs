use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Deref},
};

use serde::Serialize;

/// Fractional amount of hours. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Hours(f64);

impl Hours {
    pub const ZERO: Hours = Hours(0.);

    pub fn new_opt(value: f64) -> Option<Hours> {
        if value < 0. || value.is_nan() {
            None
        } else {
            Some(Hours(value))
        }
    }

    pub fn from_parts(hours: f64, minutes: f64, seconds: f64) -> Hours {
        Hours::new_opt(hours + minutes / 60. + seconds / 3600.).unwrap_or(Hours::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.
    }
}

/// Formats as `H:MM`. Whole hours are truncated, the remainder is rounded to minutes.
impl Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut whole = self.0.trunc() as u64;
        let mut minutes = ((self.0 - self.0.trunc()) * 60.).round() as u64;
        // 59.6 minutes rounds up into the next hour
        if minutes == 60 {
            whole += 1;
            minutes = 0;
        }
        write!(f, "{whole}:{minutes:02}")
    }
}

impl Deref for Hours {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Add for Hours {
    type Output = Hours;

    fn add(self, rhs: Self) -> Self::Output {
        Hours(self.0 + rhs.0)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Hours::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Hours> for Hours {
    fn sum<I: Iterator<Item = &'a Hours>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
