pub mod booking;
pub mod conflict;
pub mod lifecycle;

pub use booking::AppointmentBookingService;
pub use conflict::{find_conflict, validate_interval, validate_working_hours, ConflictResolver};
pub use lifecycle::{default_transitions, AppointmentWorkflow};
