use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// This is the standard way of converting a date to a string in studylog.
pub fn date_to_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the Sunday that starts the week containing `moment`. A Sunday maps onto itself.
pub fn week_start(moment: NaiveDateTime) -> NaiveDate {
    let date = moment.date();
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Returns the first moment of the day.
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Returns the last representable moment of the day, so that inclusive comparisons cover the
/// whole day.
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    day_start(date) + Duration::days(1) - Duration::microseconds(1)
}
