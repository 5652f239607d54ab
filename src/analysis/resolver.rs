use std::{fmt::Display, ops::RangeInclusive};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::{
    classifier::{ActivityTag, Classification},
    session::{ParsedSession, ResolvedSession},
};

/// Amount of lecture units covered by one study set.
pub const UNITS_PER_SET: u32 = 3;

/// 1 based identifier of a study set. Set `k` covers units `3k-2..=3k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SetId(u32);

impl SetId {
    pub const FIRST: SetId = SetId(1);

    /// The last unit of the set must fit into `u32`.
    pub fn new_opt(value: u32) -> Option<SetId> {
        (value > 0 && value <= u32::MAX / UNITS_PER_SET).then_some(SetId(value))
    }

    /// Set containing a lecture unit. There is no unit 0.
    pub fn containing(unit: u32) -> Option<SetId> {
        SetId::new_opt(unit.div_ceil(UNITS_PER_SET))
    }

    pub fn units(&self) -> RangeInclusive<u32> {
        (self.0 - 1) * UNITS_PER_SET + 1..=self.0 * UNITS_PER_SET
    }

    /// Unit range as printed in reports, e.g. `4-6`.
    pub fn units_label(&self) -> String {
        let units = self.units();
        format!("{}-{}", units.start(), units.end())
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Display for SetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assigns study sets to sessions walking forward in time. Only numbered lectures move the
/// current set, everything without its own unit number inherits it.
///
/// One resolver is meant for one pass over one report.
#[derive(Debug, Clone)]
pub struct SetResolver {
    current_set: Option<SetId>,
}

impl Default for SetResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SetResolver {
    /// Starts at the first set, so sessions before the first numbered lecture land in set 1.
    pub fn new() -> Self {
        Self {
            current_set: Some(SetId::FIRST),
        }
    }

    /// Starts without a current set. Sessions before the first numbered lecture stay unassigned.
    pub fn strict() -> Self {
        Self { current_set: None }
    }

    pub fn current_set(&self) -> Option<SetId> {
        self.current_set
    }

    /// Resolves the next session. Must be called in chronological order.
    pub fn resolve(&mut self, classification: &Classification) -> Option<SetId> {
        let referenced = classification.latest_unit().and_then(SetId::containing);
        match classification.tag {
            ActivityTag::Lecture => {
                if referenced.is_some() {
                    self.current_set = referenced;
                }
                referenced
            }
            ActivityTag::Review => {
                if classification.lecture_units.is_empty() {
                    self.current_set
                } else {
                    referenced
                }
            }
            ActivityTag::PracticeQuestions | ActivityTag::Blank | ActivityTag::Other => {
                self.current_set
            }
        }
    }
}

/// Sorts sessions by start time and resolves them in a single pass.
#[instrument(skip(sessions))]
pub fn resolve_sessions(
    mut sessions: Vec<ParsedSession>,
    mut resolver: SetResolver,
) -> Vec<ResolvedSession> {
    sessions.sort_by_key(|v| v.start());

    sessions
        .into_iter()
        .map(|session| {
            let set = resolver.resolve(&session.classification);
            debug!(
                "{} {:?} {} -> {:?}",
                session.start(),
                session.record.notes(),
                session.classification.tag,
                set
            );
            if set.is_none() {
                warn!(
                    "Session at {} with notes {:?} has no study set",
                    session.start(),
                    session.record.notes()
                );
            }
            ResolvedSession { session, set }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::{resolve_sessions, SetId, SetResolver};
    use crate::{
        analysis::{classifier::Classification, session::ParsedSession},
        export::entities::SessionRecord,
        utils::logging::TEST_LOGGING,
    };

    fn set(value: u32) -> Option<SetId> {
        SetId::new_opt(value)
    }

    fn resolve_notes(resolver: SetResolver, notes: &[&str]) -> Vec<Option<SetId>> {
        let mut resolver = resolver;
        notes
            .iter()
            .map(|v| resolver.resolve(&Classification::of(v)))
            .collect()
    }

    fn sessions(notes: &[(&str, i64)]) -> Vec<ParsedSession> {
        let base = NaiveDate::from_ymd_opt(2025, 2, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        notes
            .iter()
            .map(|(notes, offset_hours)| {
                ParsedSession::parse(SessionRecord {
                    category: "civil 総則".into(),
                    duration: Some("1 hr".into()),
                    start: base + Duration::hours(*offset_hours),
                    notes: Some(notes.to_string()).filter(|v| !v.is_empty()),
                })
            })
            .collect()
    }

    #[test]
    fn set_contains_three_units() {
        for unit in 1..=60 {
            let set = SetId::containing(unit).unwrap();
            assert_eq!(set.get(), unit.div_ceil(3));
            assert!(set.units().contains(&unit));
            assert_eq!(set.units().count(), 3);
            assert_eq!(*set.units().start(), 3 * (set.get() - 1) + 1);
            assert_eq!(*set.units().end(), 3 * set.get());
        }
        assert_eq!(SetId::containing(0), None);
        assert_eq!(SetId::containing(24), set(8));
        assert_eq!(SetId::containing(41), set(14));
        assert_eq!(set(14).unwrap().units_label(), "40-42");
    }

    #[test]
    fn lecture_moves_current_set() {
        let mut resolver = SetResolver::new();
        assert_eq!(resolver.resolve(&Classification::of("24")), set(8));
        assert_eq!(resolver.current_set(), set(8));
        assert_eq!(resolver.resolve(&Classification::of("35,36")), set(12));
        assert_eq!(resolver.current_set(), set(12));
    }

    #[test]
    fn practice_follows_lecture() {
        let assigned = resolve_notes(SetResolver::new(), &["13", "短答", "", "notes"]);
        assert_eq!(assigned, vec![set(5); 4]);
    }

    #[test]
    fn numbered_review_does_not_move_current_set() {
        let assigned = resolve_notes(SetResolver::new(), &["37", "40-41 Anki", "短答"]);
        assert_eq!(assigned, vec![set(13), set(14), set(13)]);
    }

    #[test]
    fn review_without_number_uses_current_set() {
        let assigned = resolve_notes(SetResolver::new(), &["7", "Anki"]);
        assert_eq!(assigned, vec![set(3), set(3)]);
    }

    #[test]
    fn lecture_without_usable_number_is_unassigned() {
        let mut resolver = SetResolver::new();
        assert_eq!(resolver.resolve(&Classification::of("10")), set(4));
        // reversed range yields no units
        assert_eq!(resolver.resolve(&Classification::of("12-11")), None);
        assert_eq!(resolver.resolve(&Classification::of("0 intro")), None);
        assert_eq!(resolver.current_set(), set(4));
        assert_eq!(resolver.resolve(&Classification::of("短答")), set(4));
    }

    #[test]
    fn full_width_notes_resolve_like_ascii() {
        let assigned = resolve_notes(SetResolver::new(), &["２４", "Anki ４０-４１", "短答"]);
        assert_eq!(assigned, vec![set(8), set(14), set(8)]);
    }

    #[test]
    fn huge_range_resolves_to_last_set() {
        let last = SetId::containing(u32::MAX).unwrap();
        assert_eq!(last.get(), u32::MAX / 3);
        assert_eq!(*last.units().end(), u32::MAX);
        assert_eq!(SetId::new_opt(u32::MAX / 3 + 1), None);

        let assigned = resolve_notes(SetResolver::new(), &["anki 1-4294967295", "短答"]);
        assert_eq!(assigned, vec![Some(last), set(1)]);
    }

    #[test]
    fn practice_numbers_are_ignored() {
        let assigned = resolve_notes(SetResolver::new(), &["4", "短答 30-40"]);
        assert_eq!(assigned, vec![set(2), set(2)]);
    }

    #[test]
    fn default_start_is_first_set() {
        let assigned = resolve_notes(SetResolver::new(), &["", "Anki", "1"]);
        assert_eq!(assigned, vec![set(1), set(1), set(1)]);
    }

    #[test]
    fn strict_start_leaves_leading_sessions_unassigned() {
        let assigned = resolve_notes(SetResolver::strict(), &["", "Anki", "短答", "4", ""]);
        assert_eq!(assigned, vec![None, None, None, set(2), set(2)]);
    }

    #[test]
    fn resolves_in_chronological_order() {
        *TEST_LOGGING;
        // recorded out of order, the practice session happened after lecture 13
        let input = sessions(&[("短答", 3), ("13", 1), ("1", 0), ("Anki", 2)]);
        let resolved = resolve_sessions(input, SetResolver::new());

        let assigned = resolved
            .iter()
            .map(|v| (v.session.record.notes().to_string(), v.set))
            .collect::<Vec<_>>();
        assert_eq!(
            assigned,
            vec![
                ("1".to_string(), set(1)),
                ("13".to_string(), set(5)),
                ("Anki".to_string(), set(5)),
                ("短答".to_string(), set(5)),
            ]
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let notes = [
            ("1", 0),
            ("2,3", 1),
            ("Anki", 2),
            ("", 3),
            ("4-6 anki", 4),
            ("短答", 5),
            ("8", 6),
            ("mistakes", 7),
        ];
        let first = resolve_sessions(sessions(&notes), SetResolver::new())
            .into_iter()
            .map(|v| v.set)
            .collect::<Vec<_>>();
        let second = resolve_sessions(sessions(&notes), SetResolver::new())
            .into_iter()
            .map(|v| v.set)
            .collect::<Vec<_>>();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![set(1), set(1), set(1), set(1), set(2), set(1), set(3), set(3)]
        );
    }
}
