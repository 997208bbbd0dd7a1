use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Label used when a session is recorded without a name.
pub const DEFAULT_SESSION_LABEL: &str = "Focus Session";

/// One completed focus session in the history log.
///
/// Older profiles stored `text` and `xp`; both are still accepted on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Creation instant in epoch milliseconds, unique within a history.
    pub id: i64,
    #[serde(alias = "text")]
    pub label: String,
    #[serde(alias = "xp")]
    pub experience_awarded: u64,
    /// Local calendar date, `YYYY-MM-DD`.
    pub date: String,
}

impl SessionRecord {
    /// Build the record that goes on top of `history`.
    ///
    /// The id is `at` in milliseconds, bumped past the current head so two
    /// sessions in the same millisecond still get distinct ids.
    pub fn new_head(
        history: &[SessionRecord],
        label: &str,
        experience_awarded: u64,
        at: DateTime<Local>,
    ) -> Self {
        let mut id = at.timestamp_millis();
        if let Some(head) = history.first() {
            id = id.max(head.id.saturating_add(1));
        }
        let label = label.trim();
        Self {
            id,
            label: if label.is_empty() {
                DEFAULT_SESSION_LABEL.to_string()
            } else {
                label.to_string()
            },
            experience_awarded,
            date: at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Local> {
        Local.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn blank_label_falls_back() {
        let rec = SessionRecord::new_head(&[], "   ", 250, at(1_700_000_000_000));
        assert_eq!(rec.label, DEFAULT_SESSION_LABEL);
        assert_eq!(rec.id, 1_700_000_000_000);
        assert_eq!(rec.date.len(), 10);
    }

    #[test]
    fn ids_stay_unique_within_a_millisecond() {
        let first = SessionRecord::new_head(&[], "a", 1, at(5_000));
        let second = SessionRecord::new_head(std::slice::from_ref(&first), "b", 1, at(5_000));
        assert_eq!(second.id, 5_001);
    }

    #[test]
    fn serializes_canonical_names_and_reads_legacy_ones() {
        let rec = SessionRecord::new_head(&[], "Python Quest", 300, at(1_700_000_000_000));
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["experienceAwarded"], 300);
        assert_eq!(json["label"], "Python Quest");

        let legacy: SessionRecord = serde_json::from_str(
            r#"{"id":1700000000000,"text":"Python Quest","xp":300,"date":"11/14/2023"}"#,
        )
        .unwrap();
        assert_eq!(legacy.label, "Python Quest");
        assert_eq!(legacy.experience_awarded, 300);
    }
}
