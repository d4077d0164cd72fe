use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per doctor, held by anything that reads a doctor's
/// calendar and then writes based on what it saw: bookings, reschedules and
/// deleting the doctor. Entries are never evicted; the map holds at most one
/// per doctor.
#[derive(Debug, Default)]
pub struct DoctorLocks {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl DoctorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, doctor_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(doctor_id).or_default())
        };
        lock.lock_owned().await
    }
}
