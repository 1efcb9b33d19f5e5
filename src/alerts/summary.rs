use serde::Serialize;

use super::model::{Alert, AlertPriority, AlertType};

/// Roll-up of an alert feed for the banner and dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    /// High priority
    pub urgent: usize,
    /// Medium priority
    pub important: usize,
    /// Low priority
    pub upcoming: usize,
    pub overdue_tasks: usize,
    pub tasks_due_today: usize,
    pub tasks_due_tomorrow: usize,
    pub follow_ups: usize,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut summary = AlertSummary {
            total: alerts.len(),
            ..AlertSummary::default()
        };

        for alert in alerts {
            match alert.priority {
                AlertPriority::High => summary.urgent += 1,
                AlertPriority::Medium => summary.important += 1,
                AlertPriority::Low => summary.upcoming += 1,
            }
            match alert.alert_type {
                AlertType::TaskOverdue => summary.overdue_tasks += 1,
                AlertType::TaskDueToday => summary.tasks_due_today += 1,
                AlertType::TaskDueTomorrow => summary.tasks_due_tomorrow += 1,
                AlertType::ContactFollowUp => summary.follow_ups += 1,
            }
        }

        summary
    }

    /// Highest priority present; `None` for an empty feed.
    pub fn banner_level(&self) -> Option<AlertPriority> {
        if self.urgent > 0 {
            Some(AlertPriority::High)
        } else if self.important > 0 {
            Some(AlertPriority::Medium)
        } else if self.upcoming > 0 {
            Some(AlertPriority::Low)
        } else {
            None
        }
    }

    /// e.g. "2 urgent, 1 important alerts". `None` when there is nothing to show.
    pub fn headline(&self) -> Option<String> {
        if self.total == 0 {
            return None;
        }

        let mut parts = Vec::new();
        if self.urgent > 0 {
            parts.push(format!("{} urgent", self.urgent));
        }
        if self.important > 0 {
            parts.push(format!("{} important", self.important));
        }
        if self.upcoming > 0 {
            parts.push(format!("{} upcoming", self.upcoming));
        }

        Some(format!(
            "{} alert{}",
            parts.join(", "),
            if self.total == 1 { "" } else { "s" }
        ))
    }
}
