//! Typed views over tracker fields in a day file's frontmatter.
//!
//! Trackers own no storage of their own. Each view is read from a
//! [`DailyDocument`] and written back as a batch of field updates, so the
//! rest of the frontmatter passes through untouched.

use crate::constants::{
    FIELD_DINNER, FIELD_EXERCISE, FIELD_LUNCH, FIELD_MORNING, FIELD_SLEEP_TIME, FIELD_SNACKS,
    FIELD_WAKE_TIME, TIME_FORMAT_MINUTES, TIME_FORMAT_SECONDS,
};
use crate::document::{DailyDocument, FieldValue};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

/// Wake-up and bed times for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SleepLog {
    pub date: NaiveDate,
    pub wake_time: Option<NaiveTime>,
    pub sleep_time: Option<NaiveTime>,
}

impl SleepLog {
    pub fn from_document(doc: &DailyDocument) -> Self {
        SleepLog {
            date: doc.date(),
            wake_time: time_field(doc, FIELD_WAKE_TIME),
            sleep_time: time_field(doc, FIELD_SLEEP_TIME),
        }
    }

    /// Field updates that store this log; unset times are written as null.
    pub fn to_fields(&self) -> Vec<(String, FieldValue)> {
        vec![
            (FIELD_WAKE_TIME.to_string(), time_value(self.wake_time)),
            (FIELD_SLEEP_TIME.to_string(), time_value(self.sleep_time)),
        ]
    }
}

/// What was eaten at each meal of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealLog {
    pub date: NaiveDate,
    pub morning: Vec<String>,
    pub lunch: Vec<String>,
    pub dinner: Vec<String>,
    pub snacks: Vec<String>,
}

impl MealLog {
    pub fn from_document(doc: &DailyDocument) -> Self {
        MealLog {
            date: doc.date(),
            morning: list_field(doc, FIELD_MORNING),
            lunch: list_field(doc, FIELD_LUNCH),
            dinner: list_field(doc, FIELD_DINNER),
            snacks: list_field(doc, FIELD_SNACKS),
        }
    }

    pub fn to_fields(&self) -> Vec<(String, FieldValue)> {
        vec![
            (FIELD_MORNING.to_string(), FieldValue::List(self.morning.clone())),
            (FIELD_LUNCH.to_string(), FieldValue::List(self.lunch.clone())),
            (FIELD_DINNER.to_string(), FieldValue::List(self.dinner.clone())),
            (FIELD_SNACKS.to_string(), FieldValue::List(self.snacks.clone())),
        ]
    }

    /// True when no meal has anything recorded.
    pub fn is_empty(&self) -> bool {
        self.morning.is_empty()
            && self.lunch.is_empty()
            && self.dinner.is_empty()
            && self.snacks.is_empty()
    }
}

/// Exercises done on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseLog {
    pub date: NaiveDate,
    pub exercise: Vec<String>,
}

impl ExerciseLog {
    pub fn from_document(doc: &DailyDocument) -> Self {
        ExerciseLog {
            date: doc.date(),
            exercise: list_field(doc, FIELD_EXERCISE),
        }
    }

    pub fn to_fields(&self) -> Vec<(String, FieldValue)> {
        vec![(
            FIELD_EXERCISE.to_string(),
            FieldValue::List(self.exercise.clone()),
        )]
    }
}

/// Reads an `HH:MM` (or `HH:MM:SS`) field. Null, missing and unparseable
/// values all read as `None`.
fn time_field(doc: &DailyDocument, key: &str) -> Option<NaiveTime> {
    let raw = doc.get_field_value(key)?.as_scalar()?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = NaiveTime::parse_from_str(raw, TIME_FORMAT_MINUTES)
        .or_else(|_| NaiveTime::parse_from_str(raw, TIME_FORMAT_SECONDS))
        .ok();
    if parsed.is_none() {
        debug!(date = %doc.date(), key, value = raw, "ignoring unparseable time field");
    }
    parsed
}

fn list_field(doc: &DailyDocument, key: &str) -> Vec<String> {
    doc.get_field_value(key)
        .map(FieldValue::to_list)
        .unwrap_or_default()
}

fn time_value(time: Option<NaiveTime>) -> FieldValue {
    time.map(|t| t.format(TIME_FORMAT_MINUTES).to_string())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TimePrecision;

    fn doc(frontmatter: &str) -> DailyDocument {
        DailyDocument::parse(
            NaiveDate::from_ymd_opt(2025, 12, 29).unwrap(),
            format!("---\n{}---\n\n## Journal\n", frontmatter),
            TimePrecision::Minutes,
        )
    }

    #[test]
    fn test_sleep_log_reads_times() {
        let log = SleepLog::from_document(&doc("wake_time: \"07:15\"\nsleep_time: null\n"));
        assert_eq!(log.wake_time, NaiveTime::from_hms_opt(7, 15, 0));
        assert_eq!(log.sleep_time, None);
    }

    #[test]
    fn test_sleep_log_ignores_garbage() {
        let log = SleepLog::from_document(&doc("wake_time: early\nsleep_time: \"\"\n"));
        assert_eq!(log.wake_time, None);
        assert_eq!(log.sleep_time, None);
    }

    #[test]
    fn test_sleep_log_written_back() {
        let original = doc("wake_time: null\nsleep_time: null\nmood: good\n");
        let log = SleepLog {
            date: original.date(),
            wake_time: NaiveTime::from_hms_opt(6, 30, 0),
            sleep_time: None,
        };

        let updated = original.set_field_values(log.to_fields());

        assert_eq!(SleepLog::from_document(&updated), log);
        assert!(updated.text().contains("wake_time: \"06:30\"\n"));
        assert!(updated.text().contains("sleep_time: null\nmood: good\n"));
    }

    #[test]
    fn test_meal_log_reads_all_list_shapes() {
        let log = MealLog::from_document(&doc(
            "morning: []\nlunch: [rice, \"miso soup\"]\ndinner:\n  - curry\nsnacks: cookie\n",
        ));
        assert_eq!(log.morning, Vec::<String>::new());
        assert_eq!(log.lunch, vec!["rice", "miso soup"]);
        assert_eq!(log.dinner, vec!["curry"]);
        assert_eq!(log.snacks, vec!["cookie"]);
        assert!(!log.is_empty());
    }

    #[test]
    fn test_meal_log_round_trip() {
        let original = doc("morning: []\nlunch: []\ndinner: []\nsnacks: []\n");
        assert!(MealLog::from_document(&original).is_empty());

        let log = MealLog {
            date: original.date(),
            morning: vec!["toast".to_string(), "coffee".to_string()],
            lunch: vec![],
            dinner: vec!["ramen".to_string()],
            snacks: vec![],
        };
        let updated = original.set_field_values(log.to_fields());

        assert_eq!(MealLog::from_document(&updated), log);
        assert!(updated.text().contains("lunch: []\n"));
    }

    #[test]
    fn test_exercise_log_missing_field() {
        let log = ExerciseLog::from_document(&doc("date: x\n"));
        assert!(log.exercise.is_empty());

        let updated = doc("date: x\n").set_field_values(
            ExerciseLog {
                date: log.date,
                exercise: vec!["run 5km".to_string()],
            }
            .to_fields(),
        );
        assert_eq!(
            ExerciseLog::from_document(&updated).exercise,
            vec!["run 5km"]
        );
    }
}
