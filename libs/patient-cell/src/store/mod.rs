mod memory;
mod supabase;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{NewPatient, Patient, PatientSearchQuery};

pub use memory::InMemoryPatientStore;
pub use supabase::SupabasePatientStore;

#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>>;

    /// Patients matching the query, ordered by name.
    async fn find_many(&self, query: &PatientSearchQuery) -> Result<Vec<Patient>>;

    async fn insert(&self, patient: NewPatient) -> Result<Patient>;
}
