use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use shared_database::supabase::SupabaseClient;

use super::AppointmentStore;
use crate::models::{Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, NewAppointment};

/// Embeds the doctor summary and patient so rows decode straight into [`Appointment`].
const APPOINTMENT_SELECT: &str = "*,doctor:doctors(id,name,specialization),patient:patients(*)";

#[derive(Debug, Serialize)]
struct AppointmentInsert {
    doctor_id: i64,
    patient_id: i64,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    status: AppointmentStatus,
    urgent: bool,
    created_at: DateTime<Utc>,
}

fn timestamp(at: DateTime<Utc>) -> String {
    urlencoding::encode(&at.to_rfc3339_opts(SecondsFormat::Secs, true)).into_owned()
}

pub struct SupabaseAppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn select_param() -> String {
        format!("select={}", urlencoding::encode(APPOINTMENT_SELECT))
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        let path = format!("/rest/v1/appointments?id=eq.{}&{}", id, Self::select_param());
        let rows: Vec<Appointment> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_many(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let mut query_parts = vec![Self::select_param(), "order=start_at.asc".to_string()];

        if let Some(doctor_id) = filter.doctor_id {
            query_parts.push(format!("doctor_id=eq.{}", doctor_id));
        }
        if let Some(patient_id) = filter.patient_id {
            query_parts.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(window) = filter.window {
            query_parts.push(format!("start_at=gte.{}", timestamp(window.start)));
            query_parts.push(format!("start_at=lt.{}", timestamp(window.end)));
        }

        let path = format!("/rest/v1/appointments?{}", query_parts.join("&"));
        debug!("Querying appointments: {}", path);

        let rows: Vec<Appointment> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows)
    }

    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment> {
        let body = AppointmentInsert {
            doctor_id: appointment.doctor.id,
            patient_id: appointment.patient.id,
            start_at: appointment.start_at,
            end_at: appointment.end_at,
            status: appointment.status,
            urgent: appointment.urgent,
            created_at: appointment.created_at,
        };

        let path = format!("/rest/v1/appointments?{}", Self::select_param());
        let rows: Vec<Appointment> = self.supabase.request_with_headers(
            Method::POST,
            &path,
            Some(serde_json::to_value(&body)?),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create appointment"))
    }

    async fn update(&self, id: i64, changes: &AppointmentChanges) -> Result<Appointment> {
        let path = format!("/rest/v1/appointments?id=eq.{}&{}", id, Self::select_param());
        let rows: Vec<Appointment> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(serde_json::to_value(changes)?),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Appointment {} does not exist", id))
    }
}
