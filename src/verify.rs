use crate::settings::Settings;
use crate::store::{self, PostRow, StoreClient};
use crate::utils::{
    log_verify_count, log_verify_expired, log_verify_query_failed, log_verify_start,
};
use chrono::{DateTime, Utc};

/// Pre-deletion snapshot. `None` means the query itself failed, which is
/// distinct from an observed count of zero.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub expired: Option<Vec<PostRow>>,
    pub active: Option<usize>,
    pub ordinary: Option<usize>,
}

pub fn expired_query(settings: &Settings, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
    vec![
        ("select", "id,content,expires_at".to_string()),
        ("user_id", store::eq(&settings.fixture_user_id)),
        ("is_status_post", store::eq("true")),
        ("expires_at", store::before(now)),
        ("content", store::contains(&settings.fixture_marker)),
    ]
}

pub fn active_query(settings: &Settings, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
    vec![
        ("select", "id,content,expires_at".to_string()),
        ("user_id", store::eq(&settings.fixture_user_id)),
        ("is_status_post", store::eq("true")),
        ("expires_at", store::at_or_after(now)),
        ("content", store::contains(&settings.fixture_marker)),
    ]
}

pub fn ordinary_query(settings: &Settings) -> Vec<(&'static str, String)> {
    vec![
        ("select", "id,content".to_string()),
        ("user_id", store::eq(&settings.fixture_user_id)),
        ("is_status_post", store::eq("false")),
        ("content", store::contains(&settings.fixture_marker)),
    ]
}

/// Read-only pass over the seeded state. One "now" is sampled for the whole
/// stage so the expired and active predicates partition cleanly.
pub async fn run(store: &StoreClient, settings: &Settings) -> VerifyReport {
    log_verify_start();

    let now = Utc::now();
    let mut report = VerifyReport::default();

    match store.fetch_posts(&expired_query(settings, now)).await {
        Ok(rows) => {
            log_verify_expired(&rows);
            report.expired = Some(rows);
        }
        Err(e) => log_verify_query_failed("expired status posts", &e),
    }

    match store.fetch_posts(&active_query(settings, now)).await {
        Ok(rows) => {
            log_verify_count("active status posts", rows.len());
            report.active = Some(rows.len());
        }
        Err(e) => log_verify_query_failed("active status posts", &e),
    }

    match store.fetch_posts(&ordinary_query(settings)).await {
        Ok(rows) => {
            log_verify_count("ordinary posts", rows.len());
            report.ordinary = Some(rows.len());
        }
        Err(e) => log_verify_query_failed("ordinary posts", &e),
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Strictness, DEFAULT_FIXTURE_MARKER, DEFAULT_FIXTURE_USER_ID};

    fn test_settings() -> Settings {
        Settings {
            store_url: "https://example.supabase.co".to_string(),
            service_key: "test-key".to_string(),
            fixture_user_id: DEFAULT_FIXTURE_USER_ID.to_string(),
            fixture_marker: DEFAULT_FIXTURE_MARKER.to_string(),
            strictness: Strictness::BestEffort,
        }
    }

    fn value_of<'a>(query: &'a [(&str, String)], key: &str) -> &'a str {
        query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_expired_and_active_queries_partition_on_now() {
        let settings = test_settings();
        let now = Utc::now();

        let expired = expired_query(&settings, now);
        let active = active_query(&settings, now);

        assert_eq!(value_of(&expired, "is_status_post"), "eq.true");
        assert_eq!(value_of(&active, "is_status_post"), "eq.true");
        assert_eq!(
            value_of(&expired, "expires_at"),
            format!("lt.{}", store::timestamp(now))
        );
        assert_eq!(
            value_of(&active, "expires_at"),
            format!("gte.{}", store::timestamp(now))
        );
    }

    #[test]
    fn test_all_queries_scope_to_sentinel_and_marker() {
        let settings = test_settings();
        let now = Utc::now();

        for query in [
            expired_query(&settings, now),
            active_query(&settings, now),
            ordinary_query(&settings),
        ] {
            assert_eq!(
                value_of(&query, "user_id"),
                format!("eq.{}", settings.fixture_user_id)
            );
            assert_eq!(value_of(&query, "content"), "like.*fixture*");
        }
    }

    #[test]
    fn test_ordinary_query_excludes_status_posts() {
        let query = ordinary_query(&test_settings());
        assert_eq!(value_of(&query, "is_status_post"), "eq.false");
        assert!(!query.iter().any(|(k, _)| *k == "expires_at"));
    }
}
