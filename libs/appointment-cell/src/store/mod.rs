mod dependents;
mod memory;
mod supabase;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Appointment, AppointmentChanges, AppointmentFilter, NewAppointment};

pub use dependents::AppointmentDependents;
pub use memory::InMemoryAppointmentStore;
pub use supabase::SupabaseAppointmentStore;

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>>;

    /// Matching appointments ordered by `start_at` ascending.
    async fn find_many(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>>;

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment>;

    /// Writes only the fields set in `changes` and returns the updated row.
    async fn update(&self, id: i64, changes: &AppointmentChanges) -> Result<Appointment>;
}
