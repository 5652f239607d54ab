use chrono::NaiveDateTime;

use crate::{export::entities::SessionRecord, utils::hours::Hours};

use super::{classifier::Classification, duration::parse_duration, resolver::SetId};

/// A session together with everything that can be derived from the row alone.
#[derive(Debug, Clone)]
pub struct ParsedSession {
    pub record: SessionRecord,
    pub hours: Hours,
    pub classification: Classification,
}

impl ParsedSession {
    pub fn parse(record: SessionRecord) -> Self {
        let hours = parse_duration(record.duration());
        let classification = Classification::of(record.notes());
        Self {
            record,
            hours,
            classification,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.record.start
    }
}

/// A parsed session after the study set was chosen for it.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub session: ParsedSession,
    pub set: Option<SetId>,
}
