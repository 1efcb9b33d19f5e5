use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;
pub type ContactId = i64;
pub type ActivityId = i64;
pub type DealId = i64;

// ---------------------------------------------------------------------------
// Collaborator records
// ---------------------------------------------------------------------------

/// A task tracked against a contact.
///
/// Backend fixtures use `Id` for the primary key, so it is accepted as an
/// alias on input. `dueDate` may be a bare `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "Id")]
    pub id: TaskId,
    pub title: String,
    #[serde(with = "flexible_datetime")]
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<ContactId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial update applied by `TaskStore::update`. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub contact_id: Option<ContactId>,
}

impl TaskPatch {
    /// Patch that marks a task completed and touches nothing else.
    pub fn completed() -> Self {
        Self {
            completed: Some(true),
            ..Self::default()
        }
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(contact_id) = self.contact_id {
            task.contact_id = Some(contact_id);
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub contact_id: Option<ContactId>,
}

/// Kind of logged interaction with a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Call,
    Email,
    Meeting,
    Note,
    Task,
    Deal,
    #[serde(other)]
    Other,
}

/// A logged interaction (call, email, meeting...) with a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(alias = "Id")]
    pub id: ActivityId,
    pub contact_id: ContactId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<DealId>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub description: String,
    #[serde(with = "flexible_datetime")]
    pub timestamp: DateTime<Utc>,
}

/// Input for logging an activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    pub contact_id: ContactId,
    pub deal_id: Option<DealId>,
    pub activity_type: ActivityType,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(alias = "Id")]
    pub id: ContactId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a contact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDraft {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Parse a backend timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` (read as UTC) or a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) mod flexible_datetime {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_datetime(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid date/time: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_datetime_formats() {
        let midnight = Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2026-02-18"), Some(midnight));
        assert_eq!(parse_datetime("2026-02-18T00:00:00.000Z"), Some(midnight));
        assert_eq!(parse_datetime("2026-02-18T05:00:00+05:00"), Some(midnight));
        assert_eq!(
            parse_datetime("2026-02-18T09:30"),
            Some(Utc.with_ymd_and_hms(2026, 2, 18, 9, 30, 0).unwrap())
        );
        assert_eq!(parse_datetime("next tuesday"), None);
    }

    #[test]
    fn test_task_accepts_backend_shape() {
        let task: Task = serde_json::from_str(
            r#"{"Id": 4, "title": "Call vendor", "dueDate": "2026-02-17", "completed": false, "contactId": 2}"#,
        )
        .unwrap();
        assert_eq!(task.id, 4);
        assert_eq!(task.contact_id, Some(2));
        assert_eq!(task.due_date, Utc.with_ymd_and_hms(2026, 2, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_unknown_activity_type_maps_to_other() {
        let activity: Activity = serde_json::from_str(
            r#"{"Id": 1, "contactId": 3, "type": "sms", "description": "Texted", "timestamp": "2026-02-16T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(activity.activity_type, ActivityType::Other);
        assert_eq!(activity.deal_id, None);
    }

    #[test]
    fn test_task_patch_leaves_unset_fields() {
        let mut task: Task = serde_json::from_str(
            r#"{"id": 1, "title": "Draft quote", "dueDate": "2026-03-01"}"#,
        )
        .unwrap();
        TaskPatch::completed().apply(&mut task);
        assert!(task.completed);
        assert_eq!(task.title, "Draft quote");
        assert_eq!(task.contact_id, None);
    }
}
