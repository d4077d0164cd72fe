use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DoctorStore;
use crate::models::{Doctor, DoctorSearchFilters, NewDoctor};

#[derive(Debug)]
pub struct InMemoryDoctorStore {
    doctors: RwLock<Vec<Doctor>>,
    next_id: AtomicI64,
}

impl Default for InMemoryDoctorStore {
    fn default() -> Self {
        Self {
            doctors: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryDoctorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DoctorStore for InMemoryDoctorStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>> {
        let doctors = self.doctors.read().await;
        Ok(doctors.iter().find(|d| d.id == id).cloned())
    }

    async fn find_many(&self, filters: &DoctorSearchFilters) -> Result<Vec<Doctor>> {
        let doctors = self.doctors.read().await;
        let mut found: Vec<Doctor> = doctors.iter()
            .filter(|d| filters.matches(d))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn insert(&self, doctor: NewDoctor) -> Result<Doctor> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let doctor = doctor.into_doctor(id);
        self.doctors.write().await.push(doctor.clone());
        Ok(doctor)
    }

    async fn save(&self, doctor: &Doctor) -> Result<Doctor> {
        let mut doctors = self.doctors.write().await;
        let slot = doctors.iter_mut()
            .find(|d| d.id == doctor.id)
            .ok_or_else(|| anyhow!("Doctor {} does not exist", doctor.id))?;
        *slot = doctor.clone();
        Ok(doctor.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.doctors.write().await.retain(|d| d.id != id);
        Ok(())
    }
}
