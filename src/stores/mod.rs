//! Collaborator contracts for the record backend.
//!
//! The alert engine only needs to read tasks, activities and contacts and to
//! patch a task. Implementations may sit on any storage; `memory` provides the
//! in-process stores used for fixtures and tests.

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Activity, Contact, Task, TaskId, TaskPatch};

pub use memory::{InMemoryActivityStore, InMemoryContactStore, InMemoryTaskStore};

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<Task>>;

    /// Merge `patch` into the task and return the updated record.
    async fn update(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<Activity>>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<Contact>>;
}
