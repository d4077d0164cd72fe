//! Clinic-local calendar arithmetic.
//!
//! Every day boundary and every minute-of-day comparison in the system goes
//! through one [`ClinicCalendar`], so working-hours checks, date filters and
//! queue numbering agree on what "Monday" and "today" mean.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc,
    Weekday,
};
use tracing::warn;

use shared_config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicCalendar {
    offset: FixedOffset,
}

/// Half-open `[start, end)` span covering one clinic-local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

impl Default for ClinicCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl ClinicCalendar {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn with_offset_minutes(minutes: i32) -> Self {
        match FixedOffset::east_opt(minutes * 60) {
            Some(offset) => Self { offset },
            None => {
                warn!("Clinic offset of {} minutes is out of range, using UTC", minutes);
                Self::utc()
            }
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_offset_minutes(config.clinic_utc_offset_minutes)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn local(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.offset)
    }

    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        self.local(at).date_naive()
    }

    pub fn weekday(&self, at: DateTime<Utc>) -> Weekday {
        self.local(at).weekday()
    }

    pub fn minute_of_day(&self, at: DateTime<Utc>) -> u32 {
        let local = self.local(at);
        local.hour() * 60 + local.minute()
    }

    /// `HH:MM` on the clinic wall clock.
    pub fn format_clock(&self, at: DateTime<Utc>) -> String {
        self.local(at).format("%H:%M").to_string()
    }

    pub fn day_window(&self, date: NaiveDate) -> DayWindow {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let utc_midnight = local_midnight - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        let start = Utc.from_utc_datetime(&utc_midnight);
        DayWindow {
            date,
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn day_of(&self, at: DateTime<Utc>) -> DayWindow {
        self.day_window(self.local_date(at))
    }
}
