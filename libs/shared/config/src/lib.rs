use std::env;
use tracing::warn;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    /// Fixed offset of the clinic's wall clock from UTC, in minutes.
    pub clinic_utc_offset_minutes: i32,
    pub bind_address: String,
    pub enforce_status_transitions: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            clinic_utc_offset_minutes: 0,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            enforce_status_transitions: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            clinic_utc_offset_minutes: parse_offset(env::var("CLINIC_UTC_OFFSET_MINUTES").ok()),
            bind_address: env::var("API_BIND_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("API_BIND_ADDRESS not set, using default");
                    DEFAULT_BIND_ADDRESS.to_string()
                }),
            enforce_status_transitions: parse_flag(env::var("ENFORCE_STATUS_TRANSITIONS").ok(), true),
        };

        if !config.is_configured() {
            warn!("Supabase not configured - falling back to in-memory stores");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
    }
}

fn parse_offset(raw: Option<String>) -> i32 {
    let Some(raw) = raw else {
        return 0;
    };
    match raw.trim().parse::<i32>() {
        // chrono::FixedOffset accepts strictly less than a day either way
        Ok(minutes) if minutes.abs() < 24 * 60 => minutes,
        _ => {
            warn!("CLINIC_UTC_OFFSET_MINUTES={} is not a valid offset, using UTC", raw);
            0
        }
    }
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(str::trim) {
        None => default,
        Some("1") | Some("true") | Some("TRUE") | Some("yes") => true,
        Some("0") | Some("false") | Some("FALSE") | Some("no") => false,
        Some(other) => {
            warn!("Unrecognised boolean flag value {:?}, using {}", other, default);
            default
        }
    }
}
