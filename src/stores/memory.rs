//! In-memory record stores.
//!
//! Each store keeps its records behind a `parking_lot::RwLock`, so one store
//! can be shared between the engine and whatever code edits records. Reads
//! return clones; callers never hold a reference into the store.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{ActivityStore, ContactStore, TaskStore};
use crate::error::{StoreError, StoreResult};
use crate::types::{
    Activity, ActivityDraft, ActivityId, Contact, ContactDraft, ContactId, DealId, Task,
    TaskDraft, TaskId, TaskPatch,
};

fn next_id(entity: &str, ids: impl Iterator<Item = i64>) -> StoreResult<i64> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| StoreError::backend(format!("{entity} id space exhausted")))
}

fn require_text(value: &str, message: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(message.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }

    pub fn get_by_id(&self, id: TaskId) -> StoreResult<Task> {
        self.tasks
            .read()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "Task", id })
    }

    pub fn get_by_contact_id(&self, contact_id: ContactId) -> Vec<Task> {
        self.tasks
            .read()
            .iter()
            .filter(|t| t.contact_id == Some(contact_id))
            .cloned()
            .collect()
    }

    pub fn create(&self, draft: TaskDraft) -> StoreResult<Task> {
        require_text(&draft.title, "Task title is required")?;

        let mut tasks = self.tasks.write();
        let task = Task {
            id: next_id("Task", tasks.iter().map(|t| t.id))?,
            title: draft.title,
            due_date: draft.due_date,
            completed: false,
            contact_id: draft.contact_id,
            created_at: Some(Utc::now()),
        };
        tasks.push(task.clone());
        Ok(task)
    }

    pub fn delete(&self, id: TaskId) -> StoreResult<Task> {
        let mut tasks = self.tasks.write();
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound { entity: "Task", id })?;
        Ok(tasks.remove(index))
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get_all(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.read().clone())
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        if let Some(title) = &patch.title {
            require_text(title, "Task title is required")?;
        }

        let mut tasks = self.tasks.write();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound { entity: "Task", id })?;
        patch.apply(task);
        Ok(task.clone())
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryActivityStore {
    activities: RwLock<Vec<Activity>>,
}

impl InMemoryActivityStore {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self {
            activities: RwLock::new(activities),
        }
    }

    pub fn get_by_id(&self, id: ActivityId) -> StoreResult<Activity> {
        self.activities
            .read()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "Activity",
                id,
            })
    }

    pub fn get_by_contact_id(&self, contact_id: ContactId) -> Vec<Activity> {
        self.activities
            .read()
            .iter()
            .filter(|a| a.contact_id == contact_id)
            .cloned()
            .collect()
    }

    pub fn get_by_deal_id(&self, deal_id: DealId) -> Vec<Activity> {
        self.activities
            .read()
            .iter()
            .filter(|a| a.deal_id == Some(deal_id))
            .cloned()
            .collect()
    }

    /// Log an activity. Newest entries go to the front of the list.
    pub fn create(&self, draft: ActivityDraft) -> StoreResult<Activity> {
        let mut activities = self.activities.write();
        let activity = Activity {
            id: next_id("Activity", activities.iter().map(|a| a.id))?,
            contact_id: draft.contact_id,
            deal_id: draft.deal_id,
            activity_type: draft.activity_type,
            description: draft.description,
            timestamp: draft.timestamp,
        };
        activities.insert(0, activity.clone());
        Ok(activity)
    }

    pub fn delete(&self, id: ActivityId) -> StoreResult<Activity> {
        let mut activities = self.activities.write();
        let index = activities
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::NotFound {
                entity: "Activity",
                id,
            })?;
        Ok(activities.remove(index))
    }
}

#[async_trait]
impl ActivityStore for InMemoryActivityStore {
    async fn get_all(&self) -> StoreResult<Vec<Activity>> {
        Ok(self.activities.read().clone())
    }
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryContactStore {
    contacts: RwLock<Vec<Contact>>,
}

impl InMemoryContactStore {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            contacts: RwLock::new(contacts),
        }
    }

    pub fn get_by_id(&self, id: ContactId) -> StoreResult<Contact> {
        self.contacts
            .read()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "Contact",
                id,
            })
    }

    pub fn create(&self, draft: ContactDraft) -> StoreResult<Contact> {
        require_text(&draft.name, "Contact name is required")?;

        let now = Utc::now();
        let mut contacts = self.contacts.write();
        let contact = Contact {
            id: next_id("Contact", contacts.iter().map(|c| c.id))?,
            name: draft.name,
            company: draft.company,
            email: draft.email,
            phone: draft.phone,
            tags: draft.tags,
            notes: draft.notes,
            created_at: Some(now),
            updated_at: Some(now),
        };
        contacts.push(contact.clone());
        Ok(contact)
    }

    pub fn delete(&self, id: ContactId) -> StoreResult<Contact> {
        let mut contacts = self.contacts.write();
        let index = contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound {
                entity: "Contact",
                id,
            })?;
        Ok(contacts.remove(index))
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn get_all(&self) -> StoreResult<Vec<Contact>> {
        Ok(self.contacts.read().clone())
    }
}
