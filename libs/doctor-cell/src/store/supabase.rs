use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_database::supabase::SupabaseClient;

use super::DoctorStore;
use crate::models::{Doctor, DoctorSearchFilters, NewDoctor};

pub struct SupabaseDoctorStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseDoctorStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn first_row(rows: Vec<Doctor>, action: &str) -> Result<Doctor> {
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to {} doctor profile", action))
    }
}

#[async_trait]
impl DoctorStore for SupabaseDoctorStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>> {
        let path = format!("/rest/v1/doctors?id=eq.{}", id);
        let rows: Vec<Doctor> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_many(&self, filters: &DoctorSearchFilters) -> Result<Vec<Doctor>> {
        let mut query_parts = Vec::new();

        let ilike = |column: &str, term: &Option<String>| {
            term.as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| format!("{}=ilike.*{}*", column, urlencoding::encode(t)))
        };

        query_parts.extend(ilike("specialization", &filters.specialization));
        query_parts.extend(ilike("location", &filters.location));
        query_parts.extend(ilike("name", &filters.q));
        query_parts.push("order=name.asc".to_string());

        let path = format!("/rest/v1/doctors?{}", query_parts.join("&"));
        debug!("Searching doctors: {}", path);

        let doctors: Vec<Doctor> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(doctors)
    }

    async fn insert(&self, doctor: NewDoctor) -> Result<Doctor> {
        let rows: Vec<Doctor> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            Some(serde_json::to_value(&doctor)?),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        Self::first_row(rows, "create")
    }

    async fn save(&self, doctor: &Doctor) -> Result<Doctor> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor.id);
        let rows: Vec<Doctor> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(serde_json::to_value(NewDoctor::from(doctor))?),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        Self::first_row(rows, "update")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let path = format!("/rest/v1/doctors?id=eq.{}", id);
        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(SupabaseClient::representation_headers()),
        ).await?;
        Ok(())
    }
}
