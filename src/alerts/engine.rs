//! Alert engine.
//!
//! Fetches tasks, activities and contacts from their stores, runs the
//! detector registry against them, drops dismissed alerts and returns the
//! feed ordered by urgency then recency. Dismissal state lives in an injected
//! `DismissalSet`; nothing here is persisted.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use super::detectors;
use super::dismissals::DismissalSet;
use super::model::{Alert, AlertActionType, AlertId, DismissalKey};
use crate::config::AlertSettings;
use crate::error::{AlertError, Collaborator, StoreError};
use crate::stores::{ActivityStore, ContactStore, TaskStore};
use crate::types::{Activity, Contact, Task, TaskId, TaskPatch};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Records a detector runs against.
#[derive(Debug, Clone, Copy)]
pub struct AlertSources<'a> {
    pub tasks: &'a [Task],
    pub activities: &'a [Activity],
    pub contacts: &'a [Contact],
}

/// Context passed to each detector.
#[derive(Debug, Clone, Copy)]
pub struct DetectorContext<'a> {
    pub now: DateTime<Utc>,
    pub timezone: Tz,
    pub follow_up_window: Duration,
    pub dismissed: &'a HashSet<DismissalKey>,
}

impl DetectorContext<'_> {
    /// Calendar day of `instant` in the configured zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    pub fn is_dismissed(&self, key: &DismissalKey) -> bool {
        self.dismissed.contains(key)
    }
}

/// Function signature for an alert detector.
pub type DetectorFn = fn(&AlertSources<'_>, &DetectorContext<'_>) -> Vec<Alert>;

/// Detectors in the order their output is concatenated before sorting.
pub const DEFAULT_DETECTORS: &[(&str, DetectorFn)] = &[
    ("task_due_windows", detectors::detect_task_due_windows),
    ("contact_follow_ups", detectors::detect_contact_follow_ups),
];

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive the ordered alert feed from a snapshot of the records.
pub fn derive_alerts(sources: &AlertSources<'_>, ctx: &DetectorContext<'_>) -> Vec<Alert> {
    let mut alerts = Vec::new();
    for (name, detector) in DEFAULT_DETECTORS {
        let found = detector(sources, ctx);
        log::debug!("Alert detector {} produced {} alerts", name, found.len());
        alerts.extend(found);
    }
    sort_alerts(&mut alerts);
    alerts
}

/// Priority first (high before low), then most recent timestamp first.
/// The sort is stable, so equal alerts keep detection order.
pub fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct AlertEngine {
    tasks: Arc<dyn TaskStore>,
    activities: Arc<dyn ActivityStore>,
    contacts: Arc<dyn ContactStore>,
    dismissals: Arc<DismissalSet>,
    clock: Arc<dyn Clock>,
    settings: AlertSettings,
}

impl AlertEngine {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        activities: Arc<dyn ActivityStore>,
        contacts: Arc<dyn ContactStore>,
        dismissals: Arc<DismissalSet>,
    ) -> Self {
        Self {
            tasks,
            activities,
            contacts,
            dismissals,
            clock: Arc::new(SystemClock),
            settings: AlertSettings::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_settings(mut self, settings: AlertSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &AlertSettings {
        &self.settings
    }

    /// Fetch all sources concurrently and derive the current alert feed.
    ///
    /// Any failed fetch aborts the whole call; a partial feed is never
    /// returned.
    pub async fn get_all(&self) -> Result<Vec<Alert>, AlertError> {
        let (tasks, activities, contacts) = tokio::try_join!(
            async {
                self.tasks
                    .get_all()
                    .await
                    .map_err(|e| upstream(Collaborator::Tasks, e))
            },
            async {
                self.activities
                    .get_all()
                    .await
                    .map_err(|e| upstream(Collaborator::Activities, e))
            },
            async {
                self.contacts
                    .get_all()
                    .await
                    .map_err(|e| upstream(Collaborator::Contacts, e))
            },
        )?;

        let dismissed = self.dismissals.snapshot();
        let ctx = DetectorContext {
            now: self.clock.now(),
            timezone: self.settings.timezone,
            follow_up_window: self.settings.follow_up_window,
            dismissed: &dismissed,
        };
        let sources = AlertSources {
            tasks: &tasks,
            activities: &activities,
            contacts: &contacts,
        };

        let alerts = derive_alerts(&sources, &ctx);
        log::debug!(
            "Derived {} alerts from {} tasks, {} activities ({} dismissal keys)",
            alerts.len(),
            tasks.len(),
            activities.len(),
            dismissed.len()
        );
        Ok(alerts)
    }

    /// Suppress every alert sharing this alert's source. Idempotent.
    pub fn dismiss(&self, alert_id: &AlertId) {
        let key = alert_id.dismissal_key();
        if self.dismissals.insert(key) {
            log::debug!("Dismissed alert {} ({:?})", alert_id, key);
        }
    }

    /// String form of `dismiss`. Ids that do not name a known alert kind are
    /// ignored; dismissal never fails.
    pub fn dismiss_alert(&self, alert_id: &str) {
        match alert_id.parse::<AlertId>() {
            Ok(id) => self.dismiss(&id),
            Err(e) => log::debug!("Ignoring dismissal: {}", e),
        }
    }

    /// Mark a task completed through the task store, then suppress its alerts.
    ///
    /// The dismissal is only recorded once the store accepted the update.
    pub async fn complete_task(&self, task_id: TaskId) -> Result<(), AlertError> {
        self.tasks
            .update(task_id, TaskPatch::completed())
            .await
            .map_err(|source| {
                log::warn!("Failed to complete task {}: {}", task_id, source);
                AlertError::TaskCompletion { task_id, source }
            })?;

        self.dismissals.insert(DismissalKey::Task(task_id));
        log::debug!("Completed task {} and suppressed its alerts", task_id);
        Ok(())
    }

    pub fn clear_dismissed_alerts(&self) {
        self.dismissals.clear();
    }

    pub fn dismissed_count(&self) -> usize {
        self.dismissals.len()
    }

    /// Run one of an alert's action buttons.
    ///
    /// `Complete` on an alert with no task is a no-op.
    pub async fn perform_action(
        &self,
        alert: &Alert,
        action: AlertActionType,
    ) -> Result<(), AlertError> {
        match (action, alert.task_id) {
            (AlertActionType::Complete, Some(task_id)) => self.complete_task(task_id).await,
            (AlertActionType::Complete, None) => Ok(()),
            (AlertActionType::Dismiss, _) => {
                self.dismiss(&alert.id);
                Ok(())
            }
        }
    }
}

fn upstream(collaborator: Collaborator, source: StoreError) -> AlertError {
    log::warn!("Alert source {} failed: {}", collaborator, source);
    AlertError::UpstreamFetch {
        collaborator,
        source,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
