use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::types::{Activity, Contact, ContactId, Task, TaskId};

/// Which rule produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Overdue,
    DueToday,
    DueTomorrow,
    FollowUp,
}

impl AlertKind {
    pub const ALL: [AlertKind; 4] = [
        AlertKind::Overdue,
        AlertKind::DueToday,
        AlertKind::DueTomorrow,
        AlertKind::FollowUp,
    ];

    /// Prefix used in the string form of an alert id.
    pub fn prefix(self) -> &'static str {
        match self {
            AlertKind::Overdue => "overdue",
            AlertKind::DueToday => "due-today",
            AlertKind::DueTomorrow => "due-tomorrow",
            AlertKind::FollowUp => "follow-up",
        }
    }

    pub fn alert_type(self) -> AlertType {
        match self {
            AlertKind::Overdue => AlertType::TaskOverdue,
            AlertKind::DueToday => AlertType::TaskDueToday,
            AlertKind::DueTomorrow => AlertType::TaskDueTomorrow,
            AlertKind::FollowUp => AlertType::ContactFollowUp,
        }
    }

    pub fn priority(self) -> AlertPriority {
        match self {
            AlertKind::Overdue => AlertPriority::High,
            AlertKind::DueToday | AlertKind::FollowUp => AlertPriority::Medium,
            AlertKind::DueTomorrow => AlertPriority::Low,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AlertKind::Overdue => "Overdue Task",
            AlertKind::DueToday => "Due Today",
            AlertKind::DueTomorrow => "Due Tomorrow",
            AlertKind::FollowUp => "Follow-up Needed",
        }
    }

    /// Only urgent or current items get the one-click complete action.
    pub fn actions(self) -> Vec<AlertAction> {
        match self {
            AlertKind::Overdue | AlertKind::DueToday => {
                vec![AlertAction::complete(), AlertAction::dismiss()]
            }
            AlertKind::DueTomorrow | AlertKind::FollowUp => vec![AlertAction::dismiss()],
        }
    }

    /// Dismissal key shared by every kind derived from the same source.
    pub fn dismissal_key(self, source_id: i64) -> DismissalKey {
        match self {
            AlertKind::Overdue | AlertKind::DueToday | AlertKind::DueTomorrow => {
                DismissalKey::Task(source_id)
            }
            AlertKind::FollowUp => DismissalKey::FollowUp(source_id),
        }
    }
}

/// Identity of a dismissed alert source, independent of the alert kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DismissalKey {
    Task(TaskId),
    FollowUp(ContactId),
}

/// Alert identity: the rule plus the id of the record it was derived from.
///
/// Serialized as `"<kind>-<sourceId>"`, e.g. `overdue-12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertId {
    pub kind: AlertKind,
    pub source_id: i64,
}

impl AlertId {
    pub fn new(kind: AlertKind, source_id: i64) -> Self {
        Self { kind, source_id }
    }

    pub fn dismissal_key(&self) -> DismissalKey {
        self.kind.dismissal_key(self.source_id)
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.source_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlertId(pub String);

impl fmt::Display for UnknownAlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized alert id `{}`", self.0)
    }
}

impl std::error::Error for UnknownAlertId {}

impl FromStr for AlertId {
    type Err = UnknownAlertId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        AlertKind::ALL
            .iter()
            .find_map(|&kind| {
                let rest = raw.strip_prefix(kind.prefix())?.strip_prefix('-')?;
                let source_id = rest.parse::<i64>().ok()?;
                Some(AlertId::new(kind, source_id))
            })
            .ok_or_else(|| UnknownAlertId(raw.to_string()))
    }
}

impl Serialize for AlertId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    TaskOverdue,
    TaskDueToday,
    TaskDueTomorrow,
    ContactFollowUp,
}

/// Alert urgency. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Medium,
    Low,
}

impl AlertPriority {
    pub fn rank(self) -> u8 {
        match self {
            AlertPriority::High => 0,
            AlertPriority::Medium => 1,
            AlertPriority::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertActionType {
    Complete,
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertAction {
    #[serde(rename = "type")]
    pub action_type: AlertActionType,
    pub label: String,
}

impl AlertAction {
    pub fn complete() -> Self {
        Self {
            action_type: AlertActionType::Complete,
            label: "Mark Complete".to_string(),
        }
    }

    pub fn dismiss() -> Self {
        Self {
            action_type: AlertActionType::Dismiss,
            label: "Dismiss".to_string(),
        }
    }
}

/// A derived notification. Never stored; rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<ContactId>,
    /// Snapshot of the source task (task alerts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    /// Snapshot of the source contact (follow-ups only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// Grouped recent activity, most recent first (follow-ups only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<Activity>,
    pub timestamp: DateTime<Utc>,
    pub actions: Vec<AlertAction>,
}

impl Alert {
    pub fn kind(&self) -> AlertKind {
        self.id.kind
    }

    pub fn has_action(&self, action: AlertActionType) -> bool {
        self.actions.iter().any(|a| a.action_type == action)
    }
}
