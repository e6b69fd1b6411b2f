//! In-memory implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};

/// Link store backed by a sharded concurrent map.
///
/// Insertion goes through the entry API, so two concurrent inserts of the same
/// code cannot both succeed; the loser gets [`StoreError::Conflict`] exactly
/// like the PostgreSQL unique constraint would report it.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    links: DashMap<String, Link>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.links.contains_key(code))
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict {
                code: new_link.code,
            }),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                let link = new_link.into_link(id, Utc::now());
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }
}
