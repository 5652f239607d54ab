use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    export::entities::SessionRecord,
    utils::{
        hours::Hours,
        time::{day_end, day_start, week_start},
    },
};

use super::duration::parse_duration;

/// Coarse category used by the weekly report. A category label must contain every keyword,
/// compared case insensitively.
#[derive(Debug, Clone, Copy)]
pub struct CoarseRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

/// First matching rule wins.
pub const COARSE_RULES: [CoarseRule; 5] = [
    CoarseRule {
        label: "Constitution - Essay Master",
        keywords: &["constitution", "論文マスター"],
    },
    CoarseRule {
        label: "Constitution - Basic",
        keywords: &["constitution", "basic"],
    },
    CoarseRule {
        label: "Constitution - MCQs",
        keywords: &["constitution", "短答"],
    },
    CoarseRule {
        label: "Civil Law - General Provisions",
        keywords: &["civil", "総則"],
    },
    CoarseRule {
        label: "Civil Law - Property Rights",
        keywords: &["civil", "物権"],
    },
];

/// Returns index of the matching rule in [COARSE_RULES].
pub fn coarse_category(category: &str) -> Option<usize> {
    let category = category.to_lowercase();
    COARSE_RULES
        .iter()
        .position(|rule| rule.keywords.iter().all(|k| category.contains(k)))
}

pub const DEFAULT_ANCHOR: NaiveDate = match NaiveDate::from_ymd_opt(2025, 2, 2) {
    Some(v) => v,
    None => panic!("Anchor date is valid"),
};

#[derive(Debug, Clone, Copy)]
pub struct WeeklyConfig {
    /// First week shown in the table. Expected to be a Sunday.
    pub anchor: NaiveDate,
    /// Last day counted in the summaries. Weeks starting after it are not shown.
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekRow {
    pub week_start: NaiveDate,
    /// Hours per category, aligned with [WeeklyTable::categories].
    pub hours: Vec<Hours>,
}

impl WeekRow {
    pub fn total(&self) -> Hours {
        self.hours.iter().sum()
    }
}

/// Dense table of hours per week and category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTable {
    pub categories: Vec<&'static str>,
    pub weeks: Vec<WeekRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub table: WeeklyTable,
    pub week_from: NaiveDate,
    pub week_to: NaiveDate,
    /// Hours in the 7 days ending at the end date.
    pub current_week: Hours,
    /// Hours from the beginning of the data up to the end of the end date.
    pub cumulative: Hours,
}

struct CategorizedSession {
    category: usize,
    start: chrono::NaiveDateTime,
    hours: Hours,
}

#[instrument(skip(records))]
pub fn analyze_weeks(records: &[SessionRecord], config: WeeklyConfig) -> WeeklyReport {
    let sessions = records
        .iter()
        .filter_map(|v| {
            let category = coarse_category(&v.category)?;
            Some(CategorizedSession {
                category,
                start: v.start,
                hours: parse_duration(v.duration()),
            })
        })
        .collect::<Vec<_>>();
    debug!("{} of {} sessions are categorized", sessions.len(), records.len());

    let week_from = config.end_date - Duration::days(6);
    let window_start = day_start(week_from);
    let window_end = day_end(config.end_date);

    let current_week: Hours = sessions
        .iter()
        .filter(|v| v.start >= window_start && v.start <= window_end)
        .map(|v| v.hours)
        .sum();
    let cumulative: Hours = sessions
        .iter()
        .filter(|v| v.start <= window_end)
        .map(|v| v.hours)
        .sum();

    WeeklyReport {
        table: weekly_table(&sessions, config),
        week_from,
        week_to: config.end_date,
        current_week,
        cumulative,
    }
}

fn weekly_table(sessions: &[CategorizedSession], config: WeeklyConfig) -> WeeklyTable {
    let mut present = sessions.iter().map(|v| v.category).collect::<Vec<_>>();
    present.sort();
    present.dedup();

    let mut buckets = BTreeMap::<(NaiveDate, usize), Hours>::new();
    for session in sessions {
        *buckets
            .entry((week_start(session.start), session.category))
            .or_default() += session.hours;
    }

    let Some(last_week) = buckets.keys().map(|(week, _)| *week).max() else {
        return WeeklyTable {
            categories: vec![],
            weeks: vec![],
        };
    };

    let weeks = std::iter::successors(Some(config.anchor), |v| Some(*v + Duration::days(7)))
        .take_while(|v| *v <= last_week && *v <= config.end_date)
        .map(|week| WeekRow {
            week_start: week,
            hours: present
                .iter()
                .map(|category| {
                    buckets
                        .get(&(week, *category))
                        .copied()
                        .unwrap_or_default()
                })
                .collect(),
        })
        .collect();

    WeeklyTable {
        categories: present.iter().map(|v| COARSE_RULES[*v].label).collect(),
        weeks,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::{analyze_weeks, coarse_category, WeeklyConfig, COARSE_RULES, DEFAULT_ANCHOR};
    use crate::{export::entities::SessionRecord, utils::hours::Hours};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn record(category: &str, duration: &str, start: NaiveDateTime) -> SessionRecord {
        SessionRecord {
            category: category.into(),
            duration: Some(duration.into()),
            start,
            notes: None,
        }
    }

    fn label(category: &str) -> Option<&'static str> {
        coarse_category(category).map(|v| COARSE_RULES[v].label)
    }

    #[test]
    fn categories_need_every_keyword() {
        assert_eq!(label("civil 総則"), Some("Civil Law - General Provisions"));
        assert_eq!(label("Civil 物権"), Some("Civil Law - Property Rights"));
        assert_eq!(label("Constitution Basic"), Some("Constitution - Basic"));
        assert_eq!(label("constitution 短答"), Some("Constitution - MCQs"));
        assert_eq!(label("civil"), None);
        assert_eq!(label("criminal 総則"), None);
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(
            label("constitution basic 論文マスター"),
            Some("Constitution - Essay Master")
        );
        assert_eq!(label("constitution basic 短答"), Some("Constitution - Basic"));
    }

    fn sample() -> Vec<SessionRecord> {
        vec![
            // Tuesday of the anchor week
            record("civil 総則", "1 hr", at(2025, 2, 4, 10)),
            record("constitution basic", "30 min", at(2025, 2, 5, 10)),
            // skipped week of 2025-02-09
            record("civil 総則", "2 hrs", at(2025, 2, 16, 0)),
            record("civil 総則", "45 min", at(2025, 2, 22, 23)),
            record("criminal", "5 hrs", at(2025, 2, 20, 10)),
            record("civil 物権", "1 hr", at(2025, 3, 3, 10)),
        ]
    }

    #[test]
    fn table_is_dense_from_anchor() {
        let report = analyze_weeks(
            &sample(),
            WeeklyConfig {
                anchor: DEFAULT_ANCHOR,
                end_date: date(2025, 3, 8),
            },
        );
        let table = report.table;

        assert_eq!(
            table.categories,
            vec![
                "Constitution - Basic",
                "Civil Law - General Provisions",
                "Civil Law - Property Rights",
            ]
        );
        let weeks = table.weeks.iter().map(|v| v.week_start).collect::<Vec<_>>();
        assert_eq!(
            weeks,
            vec![
                date(2025, 2, 2),
                date(2025, 2, 9),
                date(2025, 2, 16),
                date(2025, 2, 23),
                date(2025, 3, 2),
            ]
        );
        assert_eq!(table.weeks[0].hours[0].to_string(), "0:30");
        assert_eq!(table.weeks[0].hours[1].to_string(), "1:00");
        assert!(table.weeks[1].total().is_zero());
        assert_eq!(table.weeks[2].hours[1].to_string(), "2:45");
        assert_eq!(table.weeks[4].hours[2].to_string(), "1:00");
    }

    #[test]
    fn weeks_after_end_date_are_hidden() {
        let report = analyze_weeks(
            &sample(),
            WeeklyConfig {
                anchor: DEFAULT_ANCHOR,
                end_date: date(2025, 2, 15),
            },
        );
        assert_eq!(report.table.weeks.len(), 2);
    }

    #[test]
    fn summaries_use_inclusive_end_date() {
        let report = analyze_weeks(
            &sample(),
            WeeklyConfig {
                anchor: DEFAULT_ANCHOR,
                end_date: date(2025, 2, 22),
            },
        );
        assert_eq!(report.week_from, date(2025, 2, 16));
        // session at 23:00 on the end date is included
        assert_eq!(report.current_week.to_string(), "2:45");
        assert_eq!(report.cumulative.to_string(), "4:15");
    }

    #[test]
    fn no_sessions_no_table() {
        let report = analyze_weeks(
            &[],
            WeeklyConfig {
                anchor: DEFAULT_ANCHOR,
                end_date: date(2025, 2, 22),
            },
        );
        assert!(report.table.weeks.is_empty());
        assert_eq!(report.cumulative, Hours::ZERO);
    }
}
