pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use error::*;
pub use models::*;
pub use router::create_queue_router;
pub use services::{QueueSequencer, QueueWorkflow};
pub use store::{InMemoryQueueStore, QueueStore, SupabaseQueueStore};
