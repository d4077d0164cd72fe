use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_database::supabase::SupabaseClient;
use shared_utils::DayWindow;

use super::QueueStore;
use crate::models::{NewQueueEntry, QueueEntry, QueueStatus};

#[derive(Debug, Deserialize)]
struct QueueNumberRow {
    queue_number: u32,
}

pub struct SupabaseQueueStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseQueueStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn patch(&self, id: i64, body: Value) -> Result<QueueEntry> {
        let path = format!("/rest/v1/queue_entries?id=eq.{}", id);
        let rows: Vec<QueueEntry> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(body),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Queue entry {} does not exist", id))
    }
}

#[async_trait]
impl QueueStore for SupabaseQueueStore {
    async fn find_all(&self) -> Result<Vec<QueueEntry>> {
        let path = "/rest/v1/queue_entries?order=urgent.desc,queue_number.asc";
        let rows: Vec<QueueEntry> = self.supabase.request(Method::GET, path, None).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<QueueEntry>> {
        let path = format!("/rest/v1/queue_entries?id=eq.{}", id);
        let rows: Vec<QueueEntry> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn max_queue_number(&self, day: &DayWindow) -> Result<Option<u32>> {
        let path = format!(
            "/rest/v1/queue_entries?select=queue_number&queue_day=eq.{}&order=queue_number.desc&limit=1",
            day.date.format("%Y-%m-%d")
        );
        let rows: Vec<QueueNumberRow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next().map(|row| row.queue_number))
    }

    async fn insert(&self, entry: NewQueueEntry) -> Result<QueueEntry> {
        let rows: Vec<QueueEntry> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/queue_entries",
            Some(serde_json::to_value(&entry)?),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create queue entry"))
    }

    async fn set_status(&self, id: i64, status: QueueStatus) -> Result<QueueEntry> {
        self.patch(id, json!({ "status": status })).await
    }

    async fn set_urgent(&self, id: i64) -> Result<QueueEntry> {
        self.patch(id, json!({ "urgent": true })).await
    }
}
