use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::AppointmentStore;
use crate::models::{Appointment, AppointmentChanges, AppointmentFilter, NewAppointment};

#[derive(Debug)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<Vec<Appointment>>,
    next_id: AtomicI64,
}

impl Default for InMemoryAppointmentStore {
    fn default() -> Self {
        Self {
            appointments: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        Ok(self.appointments.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn find_many(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let mut found: Vec<Appointment> = self.appointments.read().await
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.start_at, a.id));
        Ok(found)
    }

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment> {
        let appointment = appointment.into_appointment(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.appointments.write().await.push(appointment.clone());
        Ok(appointment)
    }

    async fn update(&self, id: i64, changes: &AppointmentChanges) -> Result<Appointment> {
        let mut appointments = self.appointments.write().await;
        let slot = appointments.iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| anyhow!("Appointment {} does not exist", id))?;

        changes.apply_to(slot);
        Ok(slot.clone())
    }
}
