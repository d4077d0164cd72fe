pub mod calendar;
pub mod clock;
pub mod test_utils;

pub use calendar::{ClinicCalendar, DayWindow};
pub use clock::{Clock, FixedClock, SystemClock};
