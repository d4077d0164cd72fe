mod memory;
mod supabase;

use anyhow::Result;
use async_trait::async_trait;

use shared_utils::DayWindow;

use crate::models::{NewQueueEntry, QueueEntry, QueueStatus};

pub use memory::InMemoryQueueStore;
pub use supabase::SupabaseQueueStore;

#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<QueueEntry>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<QueueEntry>>;

    /// Highest number handed out on the given clinic day, whatever its status.
    async fn max_queue_number(&self, day: &DayWindow) -> Result<Option<u32>>;

    async fn insert(&self, entry: NewQueueEntry) -> Result<QueueEntry>;

    /// Writes the status column only.
    async fn set_status(&self, id: i64, status: QueueStatus) -> Result<QueueEntry>;

    /// Writes the urgent flag only.
    async fn set_urgent(&self, id: i64) -> Result<QueueEntry>;
}
