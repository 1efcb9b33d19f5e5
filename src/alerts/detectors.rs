//! Alert detectors.
//!
//! Each detector is a pure function over the fetched records and a
//! `DetectorContext`, returning zero or more alerts. Detectors apply the
//! dismissal snapshot themselves; ordering happens afterwards in the engine.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::engine::{AlertSources, DetectorContext};
use super::model::{Alert, AlertId, AlertKind, DismissalKey};
use crate::types::{Activity, ContactId, Task};

// ---------------------------------------------------------------------------
// Detector 1: Task due windows
// ---------------------------------------------------------------------------

/// Open task that is overdue, due today, or due tomorrow. At most one alert
/// per task; the first matching window wins.
pub fn detect_task_due_windows(sources: &AlertSources<'_>, ctx: &DetectorContext<'_>) -> Vec<Alert> {
    let today = ctx.local_date(ctx.now);
    let tomorrow = today.succ_opt();

    sources
        .tasks
        .iter()
        .filter(|task| !task.completed)
        .filter(|task| !ctx.is_dismissed(&DismissalKey::Task(task.id)))
        .filter_map(|task| {
            let kind = classify_due_date(task.due_date, today, tomorrow, ctx)?;
            Some(task_alert(kind, task, ctx))
        })
        .collect()
}

fn classify_due_date(
    due: DateTime<Utc>,
    today: NaiveDate,
    tomorrow: Option<NaiveDate>,
    ctx: &DetectorContext<'_>,
) -> Option<AlertKind> {
    if ctx.now > due {
        return Some(AlertKind::Overdue);
    }
    let due_day = ctx.local_date(due);
    if due_day == today {
        Some(AlertKind::DueToday)
    } else if Some(due_day) == tomorrow {
        Some(AlertKind::DueTomorrow)
    } else {
        None
    }
}

fn task_alert(kind: AlertKind, task: &Task, ctx: &DetectorContext<'_>) -> Alert {
    let message = match kind {
        AlertKind::Overdue => format!(
            "\"{}\" was due {}",
            task.title,
            task.due_date
                .with_timezone(&ctx.timezone)
                .format("%b %-d, %Y")
        ),
        AlertKind::DueToday => format!("\"{}\" is due today", task.title),
        _ => format!("\"{}\" is due tomorrow", task.title),
    };

    Alert {
        id: AlertId::new(kind, task.id),
        alert_type: kind.alert_type(),
        priority: kind.priority(),
        title: kind.title().to_string(),
        message,
        task_id: Some(task.id),
        contact_id: None,
        task: Some(task.clone()),
        contact: None,
        activities: Vec::new(),
        timestamp: task.due_date,
        actions: kind.actions(),
    }
}

// ---------------------------------------------------------------------------
// Detector 2: Contact follow-ups
// ---------------------------------------------------------------------------

/// Contact with at least one activity inside the follow-up window. One alert
/// per contact regardless of how many activities fall in the window.
pub fn detect_contact_follow_ups(
    sources: &AlertSources<'_>,
    ctx: &DetectorContext<'_>,
) -> Vec<Alert> {
    let window_start = ctx
        .now
        .checked_sub_signed(ctx.follow_up_window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut by_contact: BTreeMap<ContactId, Vec<&Activity>> = BTreeMap::new();
    for activity in sources.activities {
        if activity.timestamp >= window_start && activity.timestamp <= ctx.now {
            by_contact.entry(activity.contact_id).or_default().push(activity);
        }
    }

    let mut alerts = Vec::new();
    for (contact_id, mut recent) in by_contact {
        if ctx.is_dismissed(&DismissalKey::FollowUp(contact_id)) {
            continue;
        }
        let Some(contact) = sources.contacts.iter().find(|c| c.id == contact_id) else {
            continue;
        };

        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let Some(latest_timestamp) = recent.first().map(|a| a.timestamp) else {
            continue;
        };

        let count = recent.len();
        alerts.push(Alert {
            id: AlertId::new(AlertKind::FollowUp, contact_id),
            alert_type: AlertKind::FollowUp.alert_type(),
            priority: AlertKind::FollowUp.priority(),
            title: AlertKind::FollowUp.title().to_string(),
            message: format!(
                "{} - {} recent {}",
                contact.name,
                count,
                if count == 1 { "activity" } else { "activities" }
            ),
            task_id: None,
            contact_id: Some(contact_id),
            task: None,
            contact: Some(contact.clone()),
            timestamp: latest_timestamp,
            activities: recent.into_iter().cloned().collect(),
            actions: AlertKind::FollowUp.actions(),
        });
    }

    alerts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::alerts::model::{AlertAction, AlertPriority, AlertType};
    use crate::test_utils::{activity, contact, days_ago, fixed_now, task};
    use crate::types::Contact;

    fn test_ctx(dismissed: &HashSet<DismissalKey>) -> DetectorContext<'_> {
        DetectorContext {
            now: fixed_now(),
            timezone: chrono_tz::UTC,
            follow_up_window: Duration::days(7),
            dismissed,
        }
    }

    fn sources<'a>(
        tasks: &'a [Task],
        activities: &'a [Activity],
        contacts: &'a [Contact],
    ) -> AlertSources<'a> {
        AlertSources {
            tasks,
            activities,
            contacts,
        }
    }

    #[test]
    fn test_overdue_task_fires_high() {
        let tasks = vec![task(1, "Call vendor", days_ago(1))];
        let dismissed = HashSet::new();
        let alerts = detect_task_due_windows(&sources(&tasks, &[], &[]), &test_ctx(&dismissed));

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.id.to_string(), "overdue-1");
        assert_eq!(alert.alert_type, AlertType::TaskOverdue);
        assert_eq!(alert.priority, AlertPriority::High);
        assert_eq!(alert.task_id, Some(1));
        assert_eq!(alert.actions, vec![AlertAction::complete(), AlertAction::dismiss()]);
        assert_eq!(alert.message, "\"Call vendor\" was due Feb 17, 2026");
    }

    #[test]
    fn test_alert_json_shape() {
        let tasks = vec![task(1, "Call vendor", days_ago(1))];
        let dismissed = HashSet::new();
        let alerts = detect_task_due_windows(&sources(&tasks, &[], &[]), &test_ctx(&dismissed));
        let json = serde_json::to_value(&alerts[0]).unwrap();

        assert_eq!(json["id"], "overdue-1");
        assert_eq!(json["type"], "task_overdue");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["taskId"], 1);
        assert_eq!(json["actions"][0]["type"], "complete");
        assert_eq!(json["actions"][0]["label"], "Mark Complete");
        assert!(json.get("contactId").is_none());
        assert!(json.get("activities").is_none());
    }

    #[test]
    fn test_due_windows_are_exclusive() {
        // fixed_now() is 2026-02-18 15:00 UTC
        let tasks = vec![
            task(1, "Earlier today", Utc.with_ymd_and_hms(2026, 2, 18, 9, 0, 0).unwrap()),
            task(2, "Later today", Utc.with_ymd_and_hms(2026, 2, 18, 20, 0, 0).unwrap()),
            task(3, "Tomorrow", Utc.with_ymd_and_hms(2026, 2, 19, 10, 0, 0).unwrap()),
            task(4, "Next week", Utc.with_ymd_and_hms(2026, 2, 25, 10, 0, 0).unwrap()),
            task(5, "Midnight today", Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap()),
        ];
        let dismissed = HashSet::new();
        let alerts = detect_task_due_windows(&sources(&tasks, &[], &[]), &test_ctx(&dismissed));

        let ids: Vec<String> = alerts.iter().map(|a| a.id.to_string()).collect();
        assert_eq!(
            ids,
            vec!["overdue-1", "due-today-2", "due-tomorrow-3", "overdue-5"]
        );
        let tomorrow = &alerts[2];
        assert_eq!(tomorrow.priority, AlertPriority::Low);
        assert_eq!(tomorrow.actions, vec![AlertAction::dismiss()]);
        assert_eq!(tomorrow.message, "\"Tomorrow\" is due tomorrow");
    }

    #[test]
    fn test_completed_and_dismissed_tasks_skipped() {
        let mut done = task(1, "Done", days_ago(2));
        done.completed = true;
        let tasks = vec![done, task(2, "Muted", days_ago(2)), task(3, "Open", days_ago(2))];
        let dismissed: HashSet<_> = [DismissalKey::Task(2)].into_iter().collect();

        let alerts = detect_task_due_windows(&sources(&tasks, &[], &[]), &test_ctx(&dismissed));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].task_id, Some(3));
    }

    #[test]
    fn test_calendar_day_uses_timezone() {
        // 03:00 UTC on the 19th is 22:00 on the 18th in New York.
        let now = Utc.with_ymd_and_hms(2026, 2, 19, 3, 0, 0).unwrap();
        let tasks = vec![task(1, "Early call", Utc.with_ymd_and_hms(2026, 2, 19, 6, 0, 0).unwrap())];
        let dismissed = HashSet::new();

        let mut ctx = test_ctx(&dismissed);
        ctx.now = now;
        let utc_alerts = detect_task_due_windows(&sources(&tasks, &[], &[]), &ctx);
        assert_eq!(utc_alerts[0].alert_type, AlertType::TaskDueToday);

        ctx.timezone = chrono_tz::America::New_York;
        let ny_alerts = detect_task_due_windows(&sources(&tasks, &[], &[]), &ctx);
        assert_eq!(ny_alerts[0].alert_type, AlertType::TaskDueTomorrow);
    }

    #[test]
    fn test_follow_up_groups_by_contact() {
        let contacts = vec![contact(1, "Jane Doe"), contact(2, "Raj Patel")];
        let activities = vec![
            activity(10, 1, days_ago(2)),
            activity(11, 1, days_ago(1)),
            activity(12, 2, days_ago(3)),
            activity(13, 2, days_ago(30)),
        ];
        let dismissed = HashSet::new();
        let alerts =
            detect_contact_follow_ups(&sources(&[], &activities, &contacts), &test_ctx(&dismissed));

        assert_eq!(alerts.len(), 2);
        let jane = &alerts[0];
        assert_eq!(jane.id.to_string(), "follow-up-1");
        assert_eq!(jane.message, "Jane Doe - 2 recent activities");
        assert_eq!(jane.timestamp, days_ago(1));
        assert_eq!(jane.activities[0].id, 11);
        assert_eq!(jane.actions, vec![AlertAction::dismiss()]);
        assert_eq!(alerts[1].message, "Raj Patel - 1 recent activity");
    }

    #[test]
    fn test_follow_up_window_bounds() {
        let contacts = vec![contact(1, "Jane Doe"), contact(2, "Raj Patel"), contact(3, "Li Wei")];
        let activities = vec![
            activity(1, 1, fixed_now() - Duration::days(7)),
            activity(2, 2, fixed_now() - Duration::days(7) - Duration::seconds(1)),
            activity(3, 3, fixed_now() + Duration::hours(1)),
        ];
        let dismissed = HashSet::new();
        let alerts =
            detect_contact_follow_ups(&sources(&[], &activities, &contacts), &test_ctx(&dismissed));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].contact_id, Some(1));
    }

    #[test]
    fn test_follow_up_window_past_calendar_range() {
        let contacts = vec![contact(1, "Jane Doe")];
        let activities = vec![activity(1, 1, days_ago(400)), activity(2, 1, days_ago(1))];
        let dismissed = HashSet::new();
        let mut ctx = test_ctx(&dismissed);
        ctx.follow_up_window = Duration::try_days(100_000_000).unwrap();

        let alerts = detect_contact_follow_ups(&sources(&[], &activities, &contacts), &ctx);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "Jane Doe - 2 recent activities");
    }

    #[test]
    fn test_follow_up_skips_unknown_and_dismissed_contacts() {
        let contacts = vec![contact(1, "Jane Doe")];
        let activities = vec![activity(1, 1, days_ago(1)), activity(2, 99, days_ago(1))];
        let dismissed: HashSet<_> = [DismissalKey::FollowUp(1)].into_iter().collect();

        let alerts =
            detect_contact_follow_ups(&sources(&[], &activities, &contacts), &test_ctx(&dismissed));
        assert!(alerts.is_empty());
    }
}
