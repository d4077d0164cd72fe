use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use shared_utils::DayWindow;

use super::QueueStore;
use crate::models::{NewQueueEntry, QueueEntry, QueueStatus};

#[derive(Debug)]
pub struct InMemoryQueueStore {
    entries: RwLock<Vec<QueueEntry>>,
    next_id: AtomicI64,
}

impl Default for InMemoryQueueStore {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn find_all(&self) -> Result<Vec<QueueEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<QueueEntry>> {
        Ok(self.entries.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn max_queue_number(&self, day: &DayWindow) -> Result<Option<u32>> {
        Ok(self.entries.read().await
            .iter()
            .filter(|e| day.contains(e.created_at))
            .map(|e| e.queue_number)
            .max())
    }

    async fn insert(&self, entry: NewQueueEntry) -> Result<QueueEntry> {
        let mut entries = self.entries.write().await;

        // Mirrors the unique (queue_day, queue_number) index of the hosted schema.
        if entries.iter().any(|e| e.queue_day == entry.queue_day && e.queue_number == entry.queue_number) {
            bail!("Queue number {} already issued on {}", entry.queue_number, entry.queue_day);
        }

        let entry = entry.into_entry(self.next_id.fetch_add(1, Ordering::SeqCst));
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn set_status(&self, id: i64, status: QueueStatus) -> Result<QueueEntry> {
        let mut entries = self.entries.write().await;
        let slot = find_mut(&mut entries, id)?;
        slot.status = status;
        Ok(slot.clone())
    }

    async fn set_urgent(&self, id: i64) -> Result<QueueEntry> {
        let mut entries = self.entries.write().await;
        let slot = find_mut(&mut entries, id)?;
        slot.urgent = true;
        Ok(slot.clone())
    }
}

fn find_mut(entries: &mut [QueueEntry], id: i64) -> Result<&mut QueueEntry> {
    entries.iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| anyhow!("Queue entry {} does not exist", id))
}
