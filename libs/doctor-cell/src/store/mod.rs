//! Persistence seam for doctor profiles.

mod memory;
mod supabase;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Doctor, DoctorSearchFilters, NewDoctor};

pub use memory::InMemoryDoctorStore;
pub use supabase::SupabaseDoctorStore;

#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>>;

    /// Doctors matching `filters`, ordered by name.
    async fn find_many(&self, filters: &DoctorSearchFilters) -> Result<Vec<Doctor>>;

    async fn insert(&self, doctor: NewDoctor) -> Result<Doctor>;

    async fn save(&self, doctor: &Doctor) -> Result<Doctor>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// Answers whether other records still point at a doctor. Implemented by
/// the appointment cell so deletion can be refused before anything is removed.
#[async_trait]
pub trait DoctorDependents: Send + Sync {
    async fn has_appointments(&self, doctor_id: i64) -> Result<bool>;
}
