//! Shared fixtures for unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{StoreError, StoreResult};
use crate::stores::{ActivityStore, TaskStore};
use crate::types::{Activity, ActivityType, Contact, ContactId, Task, TaskId, TaskPatch};

/// 2026-02-18 15:00 UTC, a Wednesday afternoon.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 18, 15, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    fixed_now() - Duration::days(days)
}

pub fn task(id: TaskId, title: &str, due_date: DateTime<Utc>) -> Task {
    Task {
        id,
        title: title.to_string(),
        due_date,
        completed: false,
        contact_id: None,
        created_at: None,
    }
}

pub fn contact(id: ContactId, name: &str) -> Contact {
    Contact {
        id,
        name: name.to_string(),
        company: None,
        email: None,
        phone: None,
        tags: Vec::new(),
        notes: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn activity(id: i64, contact_id: ContactId, timestamp: DateTime<Utc>) -> Activity {
    Activity {
        id,
        contact_id,
        deal_id: None,
        activity_type: ActivityType::Email,
        description: format!("Activity {id}"),
        timestamp,
    }
}

/// Activity store whose backend is always down.
pub struct FailingActivityStore;

#[async_trait]
impl ActivityStore for FailingActivityStore {
    async fn get_all(&self) -> StoreResult<Vec<Activity>> {
        Err(StoreError::backend("activities backend unavailable"))
    }
}

/// Task store that serves reads but rejects every write.
pub struct FailingTaskStore {
    tasks: Vec<Task>,
}

impl FailingTaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl TaskStore for FailingTaskStore {
    async fn get_all(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    async fn update(&self, _id: TaskId, _patch: TaskPatch) -> StoreResult<Task> {
        Err(StoreError::backend("write rejected"))
    }
}
