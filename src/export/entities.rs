use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the time tracking export. Rows are never modified after being read.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize, Clone)]
pub struct SessionRecord {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Duration", deserialize_with = "empty_as_none")]
    pub duration: Option<String>,
    #[serde(rename = "Start", with = "start_ser")]
    pub start: NaiveDateTime,
    #[serde(rename = "Notes", deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}

impl SessionRecord {
    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    pub fn duration(&self) -> &str {
        self.duration.as_deref().unwrap_or("")
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// Exports are not consistent about timestamps, so a handful of layouts is accepted. Offsets are
/// dropped and the wall clock time is kept.
pub(crate) mod start_ser {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    const FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|v| v.naive_local())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .ok()
                    .map(|v| v.and_time(NaiveTime::MIN))
            })
    }

    pub fn serialize<S>(start: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&start.format(OUTPUT_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| D::Error::custom(format!("Can't parse start time {s:?}")))
    }
}
