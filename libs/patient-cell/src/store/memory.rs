use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::PatientStore;
use crate::models::{NewPatient, Patient, PatientSearchQuery};

#[derive(Debug)]
pub struct InMemoryPatientStore {
    patients: RwLock<Vec<Patient>>,
    next_id: AtomicI64,
}

impl Default for InMemoryPatientStore {
    fn default() -> Self {
        Self {
            patients: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>> {
        Ok(self.patients.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_many(&self, query: &PatientSearchQuery) -> Result<Vec<Patient>> {
        let needle = query.q.as_deref().map(|q| q.trim().to_lowercase()).unwrap_or_default();
        let patients = self.patients.read().await;

        let mut found: Vec<Patient> = patients.iter()
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn insert(&self, patient: NewPatient) -> Result<Patient> {
        let patient = patient.into_patient(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.patients.write().await.push(patient.clone());
        Ok(patient)
    }
}
