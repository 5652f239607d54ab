use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    export::entities::{start_ser, SessionRecord},
    utils::hours::Hours,
};

use super::{
    classifier::ActivityTag,
    resolver::{resolve_sessions, SetId, SetResolver},
    session::{ParsedSession, ResolvedSession},
};

/// Time spent on one study set, split by activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetSummary {
    pub set: SetId,
    pub units: String,
    pub lecture: Hours,
    pub review: Hours,
    pub practice: Hours,
    /// Blank and unrecognized notes.
    pub other: Hours,
}

impl SetSummary {
    fn new(set: SetId) -> Self {
        Self {
            set,
            units: set.units_label(),
            lecture: Hours::ZERO,
            review: Hours::ZERO,
            practice: Hours::ZERO,
            other: Hours::ZERO,
        }
    }

    fn add(&mut self, tag: ActivityTag, hours: Hours) {
        match tag {
            ActivityTag::Lecture => self.lecture += hours,
            ActivityTag::Review => self.review += hours,
            ActivityTag::PracticeQuestions => self.practice += hours,
            ActivityTag::Blank | ActivityTag::Other => self.other += hours,
        }
    }

    pub fn total(&self) -> Hours {
        self.lecture + self.review + self.practice + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnassignedSession {
    #[serde(with = "start_ser")]
    pub start: NaiveDateTime,
    pub notes: String,
    pub hours: Hours,
}

/// Result of the set analysis for a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetReport {
    pub category: String,
    pub total_sessions: usize,
    pub assigned_sessions: usize,
    pub unassigned: Vec<UnassignedSession>,
    pub unassigned_hours: Hours,
    pub sets: Vec<SetSummary>,
}

impl SetReport {
    pub fn total_hours(&self) -> Hours {
        self.sets.iter().map(SetSummary::total).sum::<Hours>() + self.unassigned_hours
    }
}

/// Groups resolved sessions by set and activity. Unassigned sessions are kept apart and never
/// count towards any set.
pub fn summarize_sets(category: &str, sessions: &[ResolvedSession]) -> SetReport {
    let mut sets = BTreeMap::<SetId, SetSummary>::new();
    let mut unassigned = vec![];

    for resolved in sessions {
        let session = &resolved.session;
        match resolved.set {
            Some(set) => sets
                .entry(set)
                .or_insert_with(|| SetSummary::new(set))
                .add(session.classification.tag, session.hours),
            None => unassigned.push(UnassignedSession {
                start: session.start(),
                notes: session.record.notes().to_string(),
                hours: session.hours,
            }),
        }
    }

    let unassigned_hours: Hours = unassigned.iter().map(|v| v.hours).sum();

    SetReport {
        category: category.to_string(),
        total_sessions: sessions.len(),
        assigned_sessions: sessions.len() - unassigned.len(),
        unassigned,
        unassigned_hours,
        sets: sets.into_values().collect(),
    }
}

/// Runs the whole set analysis for sessions of one category. Sessions of other categories are
/// ignored, no matching sessions gives an empty report.
#[instrument(skip(records, resolver))]
pub fn analyze_sets(records: Vec<SessionRecord>, category: &str, resolver: SetResolver) -> SetReport {
    let sessions = records
        .into_iter()
        .filter(|v| v.category == category)
        .map(ParsedSession::parse)
        .collect::<Vec<_>>();

    let resolved = resolve_sessions(sessions, resolver);
    let report = summarize_sets(category, &resolved);
    info!(
        "{} sessions, {} sets, {} unassigned",
        report.total_sessions,
        report.sets.len(),
        report.unassigned.len()
    );
    report
}
