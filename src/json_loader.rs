//! JSON seed loader for the in-memory stores
//!
//! A seed directory holds up to three JSON arrays:
//! - `tasks.json`
//! - `activities.json`
//! - `contacts.json`
//!
//! A missing file means "no records of that kind". A file that exists but
//! does not parse is an error, so a typo never silently empties a store.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::stores::{InMemoryActivityStore, InMemoryContactStore, InMemoryTaskStore};
use crate::types::{Activity, Contact, Task};

pub const TASKS_FILE: &str = "tasks.json";
pub const ACTIVITIES_FILE: &str = "activities.json";
pub const CONTACTS_FILE: &str = "contacts.json";

/// Records loaded from a seed directory.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub tasks: Vec<Task>,
    pub activities: Vec<Activity>,
    pub contacts: Vec<Contact>,
}

impl SeedData {
    pub fn into_stores(
        self,
    ) -> (
        Arc<InMemoryTaskStore>,
        Arc<InMemoryActivityStore>,
        Arc<InMemoryContactStore>,
    ) {
        (
            Arc::new(InMemoryTaskStore::new(self.tasks)),
            Arc::new(InMemoryActivityStore::new(self.activities)),
            Arc::new(InMemoryContactStore::new(self.contacts)),
        )
    }
}

/// Load all seed files from `dir`
pub fn load_seed_data(dir: &Path) -> Result<SeedData, String> {
    let seed = SeedData {
        tasks: load_records(&dir.join(TASKS_FILE))?,
        activities: load_records(&dir.join(ACTIVITIES_FILE))?,
        contacts: load_records(&dir.join(CONTACTS_FILE))?,
    };
    log::info!(
        "Loaded seed data from {}: {} tasks, {} activities, {} contacts",
        dir.display(),
        seed.tasks.len(),
        seed.activities.len(),
        seed.contacts.len()
    );
    Ok(seed)
}

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, String> {
    if !path.exists() {
        log::warn!("Seed file {} not found, starting empty", path.display());
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}
