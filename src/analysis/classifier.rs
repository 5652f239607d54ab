use std::{borrow::Cow, fmt::Display, ops::RangeInclusive, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

/// What kind of studying a session was, judged only by its notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ActivityTag {
    Lecture,
    Review,
    PracticeQuestions,
    Blank,
    Other,
}

impl Display for ActivityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityTag::Lecture => write!(f, "lecture"),
            ActivityTag::Review => write!(f, "review"),
            ActivityTag::PracticeQuestions => write!(f, "practice"),
            ActivityTag::Blank => write!(f, "blank"),
            ActivityTag::Other => write!(f, "other"),
        }
    }
}

const REVIEW_KEYWORDS: [&str; 3] = ["anki", "復習", "review"];
const PRACTICE_KEYWORDS: [&str; 4] = ["短答", "過去問", "practice", "past exam"];

/// A single classification rule. Receives trimmed, lowercased notes.
pub struct TagRule {
    pub tag: ActivityTag,
    pub matches: fn(&str) -> bool,
}

/// Rules are checked top to bottom, the first match decides the tag.
pub const TAG_RULES: [TagRule; 4] = [
    TagRule {
        tag: ActivityTag::Blank,
        matches: str::is_empty,
    },
    TagRule {
        tag: ActivityTag::Review,
        matches: |notes| REVIEW_KEYWORDS.iter().any(|k| notes.contains(k)),
    },
    TagRule {
        tag: ActivityTag::PracticeQuestions,
        matches: |notes| PRACTICE_KEYWORDS.iter().any(|k| notes.contains(k)),
    },
    TagRule {
        tag: ActivityTag::Lecture,
        matches: |notes| LEADING_NUMBER_REGEX.is_match(notes),
    },
];

/// Returns the activity tag of a session based on its notes.
pub fn classify(notes: &str) -> ActivityTag {
    let notes = fold_digits(notes.trim()).to_lowercase();
    TAG_RULES
        .iter()
        .find(|rule| (rule.matches)(&notes))
        .map(|rule| rule.tag)
        .unwrap_or(ActivityTag::Other)
}

/// Replaces full width digits with ASCII ones. Only ASCII digits are recognized afterwards.
pub fn fold_digits(notes: &str) -> Cow<'_, str> {
    if !notes.contains(|c: char| ('０'..='９').contains(&c)) {
        return Cow::Borrowed(notes);
    }
    notes
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            c => c,
        })
        .collect::<String>()
        .into()
}

static RANGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)-([0-9]+)").unwrap());
static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());
static LEADING_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+").unwrap());

/// Lecture units mentioned in notes. Ranges keep only their bounds, notes like "1-30000000"
/// would be expensive otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LectureUnits {
    Range(RangeInclusive<u32>),
    List(Vec<u32>),
}

impl LectureUnits {
    pub fn none() -> Self {
        LectureUnits::List(vec![])
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LectureUnits::Range(range) => range.is_empty(),
            LectureUnits::List(units) => units.is_empty(),
        }
    }

    /// The highest unit mentioned.
    pub fn latest(&self) -> Option<u32> {
        match self {
            LectureUnits::Range(range) => (!range.is_empty()).then(|| *range.end()),
            LectureUnits::List(units) => units.iter().copied().max(),
        }
    }
}

/// Extracts lecture units mentioned in notes.
///
/// In order of precedence:
///  - the first `A-B` range anywhere in the notes, covering every unit from A to B;
///  - the first number of every comma separated part;
///  - a number the notes start with.
///
/// A reversed range like "5-3" yields nothing, and neither do numbers too large to be units.
pub fn extract_lecture_units(notes: &str) -> LectureUnits {
    let notes = fold_digits(notes);
    let notes = notes.as_ref();
    if notes.trim().is_empty() {
        return LectureUnits::none();
    }

    if let Some(captures) = RANGE_REGEX.captures(notes) {
        let start = captures[1].parse::<u32>();
        let end = captures[2].parse::<u32>();
        return match (start, end) {
            (Ok(start), Ok(end)) => LectureUnits::Range(start..=end),
            _ => LectureUnits::none(),
        };
    }

    if notes.contains(',') {
        let numbers = notes
            .split(',')
            .filter_map(|part| NUMBER_REGEX.find(part))
            .filter_map(|v| v.as_str().parse::<u32>().ok())
            .collect::<Vec<_>>();
        if !numbers.is_empty() {
            return LectureUnits::List(numbers);
        }
    }

    LectureUnits::List(
        LEADING_NUMBER_REGEX
            .find(notes.trim())
            .and_then(|v| v.as_str().parse::<u32>().ok())
            .into_iter()
            .collect(),
    )
}

/// Everything the resolver needs to know about a single session's notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub tag: ActivityTag,
    pub lecture_units: LectureUnits,
}

impl Classification {
    pub fn of(notes: &str) -> Self {
        Self {
            tag: classify(notes),
            lecture_units: extract_lecture_units(notes),
        }
    }

    /// The latest unit the notes refer to.
    pub fn latest_unit(&self) -> Option<u32> {
        self.lecture_units.latest()
    }
}
