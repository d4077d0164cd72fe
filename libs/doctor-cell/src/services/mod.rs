pub mod doctor;
pub mod availability;
pub mod calendar_lock;

pub use calendar_lock::DoctorLocks;
pub use doctor::DoctorService;
pub use availability::{apply_availability, validate_working_hours_template};
