// Data models for the to-do store

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a task. Generated once at creation and never changed.
pub type TaskId = Uuid;

/// Date format used for `dueDate` in the persisted slot
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub is_important: bool,
    #[serde(with = "due_date")]
    pub due_date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub is_done: bool,
}

impl Task {
    /// Build a fresh, not-yet-done task with a new id.
    ///
    /// No validation happens here; `TaskStore::add` owns the title and
    /// category rules.
    pub fn new(title: impl Into<String>, is_important: bool, due_date: NaiveDate, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            is_important,
            due_date,
            category: category.into(),
            is_done: false,
        }
    }
}

/// Serde adapter for `dueDate`.
///
/// Writes `YYYY-MM-DD`. Reads that, an RFC 3339 timestamp, or a number of
/// seconds since 2001-01-01T00:00:00Z (the reference date older slots were
/// written with). Numeric timestamps become the local calendar day, which is
/// the day the user saw when the task was created.
pub(crate) mod due_date {
    use super::DATE_FORMAT;
    use chrono::{DateTime, Local, NaiveDate, TimeZone};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// 2001-01-01T00:00:00Z as a Unix timestamp
    pub const REFERENCE_EPOCH_SECS: i64 = 978_307_200;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Seconds(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => parse_text(&text).ok_or_else(|| D::Error::custom(format!("invalid due date: {text:?}"))),
            Raw::Seconds(secs) => {
                from_reference_seconds(secs).ok_or_else(|| D::Error::custom(format!("due date out of range: {secs}")))
            }
        }
    }

    fn parse_text(text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
    }

    pub fn from_reference_seconds(secs: f64) -> Option<NaiveDate> {
        from_reference_seconds_in(secs, &Local)
    }

    pub fn from_reference_seconds_in<Tz: TimeZone>(secs: f64, tz: &Tz) -> Option<NaiveDate> {
        if !secs.is_finite() {
            return None;
        }
        let unix = (secs.floor() as i64).checked_add(REFERENCE_EPOCH_SECS)?;
        DateTime::from_timestamp(unix, 0).map(|dt| dt.with_timezone(tz).date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_new_defaults() {
        let task = Task::new("Write spec", true, date(2024, 1, 1), "Work");
        assert_eq!(task.title, "Write spec");
        assert!(task.is_important);
        assert!(!task.is_done);
        assert_eq!(task.category, "Work");
    }

    #[test]
    fn test_task_serialization_keys() {
        let task = Task::new("Write spec", true, date(2024, 1, 1), "Work");
        let json = serde_json::to_string(&task).unwrap();

        assert!(json.contains("\"isImportant\":true"));
        assert!(json.contains("\"dueDate\":\"2024-01-01\""));
        assert!(json.contains("\"isDone\":false"));
        assert!(json.contains(&format!("\"id\":\"{}\"", task.id)));
    }

    #[test]
    fn test_due_date_accepts_reference_seconds() {
        // 2024-01-01T12:00:00Z
        let secs = (1_704_110_400 - due_date::REFERENCE_EPOCH_SECS) as f64;
        let json = format!(
            r#"{{"id":"0190a5c4-0000-7000-8000-000000000001","title":"Old","isImportant":false,"dueDate":{secs},"category":"Other","isDone":true}}"#
        );

        let task: Task = serde_json::from_str(&json).unwrap();
        let local_day = chrono::DateTime::from_timestamp(1_704_110_400, 0)
            .unwrap()
            .with_timezone(&chrono::Local)
            .date_naive();
        assert_eq!(task.due_date, local_day);
        assert!(task.is_done);
    }

    #[test]
    fn test_reference_seconds_use_local_day() {
        // 2024-01-01T20:00:00Z
        let secs = (1_704_139_200 - due_date::REFERENCE_EPOCH_SECS) as f64;
        let utc = chrono::FixedOffset::east_opt(0).unwrap();
        let ist = chrono::FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let pst = chrono::FixedOffset::west_opt(8 * 3600).unwrap();

        assert_eq!(due_date::from_reference_seconds_in(secs, &utc), Some(date(2024, 1, 1)));
        assert_eq!(due_date::from_reference_seconds_in(secs, &ist), Some(date(2024, 1, 2)));
        assert_eq!(due_date::from_reference_seconds_in(secs, &pst), Some(date(2024, 1, 1)));
        assert_eq!(due_date::from_reference_seconds_in(f64::NAN, &utc), None);
    }

    #[test]
    fn test_due_date_accepts_rfc3339() {
        let json = r#"{"id":"0190a5c4-0000-7000-8000-000000000002","title":"T","isImportant":false,"dueDate":"2024-03-05T08:30:00Z","category":"Work"}"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.due_date, date(2024, 3, 5));
        assert!(!task.is_done, "missing isDone defaults to false");
    }

    #[test]
    fn test_due_date_rejects_garbage() {
        let json = r#"{"id":"0190a5c4-0000-7000-8000-000000000003","title":"T","isImportant":false,"dueDate":"soon","category":"Work","isDone":false}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }
}
