use crate::fixtures::NewPost;
use crate::settings::Settings;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

/// Row shape echoed back by the posts resource. Only the columns the harness
/// selects are modeled; everything else stays on the server.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRow {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

pub fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn eq(value: &str) -> String {
    format!("eq.{value}")
}

pub fn contains(substring: &str) -> String {
    format!("like.*{substring}*")
}

pub fn before(t: DateTime<Utc>) -> String {
    format!("lt.{}", timestamp(t))
}

pub fn at_or_after(t: DateTime<Utc>) -> String {
    format!("gte.{}", timestamp(t))
}

/// Thin client over the store's REST facade. Every call is a single blocking
/// round-trip awaited in order; callers own sequencing.
pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl StoreClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.store_url.clone(),
            service_key: settings.service_key.clone(),
        }
    }

    fn resource(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub async fn fetch_posts(&self, query: &[(&str, String)]) -> Result<Vec<PostRow>, String> {
        let response = self
            .client
            .get(self.resource("posts"))
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("API error: {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Parse failed: {}", e))
    }

    pub async fn delete_where(
        &self,
        table: &str,
        column: &str,
        filter: String,
    ) -> Result<(), String> {
        let response = self
            .client
            .delete(self.resource(table))
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .query(&[(column, filter)])
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("API error: {}", response.status()));
        }

        Ok(())
    }

    /// Inserts one post. Returns the created row's id when the store echoes
    /// it back; an error carries the status and raw body for diagnosis.
    pub async fn create_post(&self, post: &NewPost) -> Result<Option<String>, String> {
        let response = self
            .client
            .post(self.resource("posts"))
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Prefer", "return=representation")
            .json(post)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("{}: {}", status, body));
        }

        let rows: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("Parse failed: {}", e))?;

        let id = rows
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|row| row.get("id"))
            .and_then(|id| id.as_str())
            .map(|id| id.to_string());

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filter_grammar() {
        assert_eq!(eq("true"), "eq.true");
        assert_eq!(
            eq("00000000-0000-0000-0000-000000000001"),
            "eq.00000000-0000-0000-0000-000000000001"
        );
        assert_eq!(contains("fixture"), "like.*fixture*");
    }

    #[test]
    fn test_timestamp_is_utc_rfc3339() {
        let t = Utc.with_ymd_and_hms(2026, 8, 29, 10, 30, 0).unwrap();
        let formatted = timestamp(t);
        assert!(formatted.starts_with("2026-08-29T10:30:00"));
        assert!(formatted.ends_with('Z'));
    }

    #[test]
    fn test_comparison_filters_carry_timestamp() {
        let t = Utc.with_ymd_and_hms(2026, 8, 29, 10, 30, 0).unwrap();
        assert_eq!(before(t), format!("lt.{}", timestamp(t)));
        assert_eq!(at_or_after(t), format!("gte.{}", timestamp(t)));
    }
}
