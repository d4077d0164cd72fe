use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use doctor_cell::DoctorDependents;

use super::AppointmentStore;
use crate::models::AppointmentFilter;

/// Lets the doctor cell refuse to delete a doctor who still has bookings.
pub struct AppointmentDependents {
    store: Arc<dyn AppointmentStore>,
}

impl AppointmentDependents {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DoctorDependents for AppointmentDependents {
    async fn has_appointments(&self, doctor_id: i64) -> Result<bool> {
        let booked = self.store.find_many(&AppointmentFilter::for_doctor(doctor_id)).await?;
        Ok(!booked.is_empty())
    }
}
