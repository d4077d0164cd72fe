use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;

use shared_database::supabase::SupabaseClient;

use super::PatientStore;
use crate::models::{NewPatient, Patient, PatientSearchQuery};

pub struct SupabasePatientStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabasePatientStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl PatientStore for SupabasePatientStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>> {
        let path = format!("/rest/v1/patients?id=eq.{}", id);
        let rows: Vec<Patient> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_many(&self, query: &PatientSearchQuery) -> Result<Vec<Patient>> {
        let mut path = "/rest/v1/patients?order=name.asc".to_string();
        if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            path.push_str(&format!("&name=ilike.*{}*", urlencoding::encode(q)));
        }

        let rows: Vec<Patient> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows)
    }

    async fn insert(&self, patient: NewPatient) -> Result<Patient> {
        let rows: Vec<Patient> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/patients",
            Some(serde_json::to_value(&patient)?),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create patient"))
    }
}
