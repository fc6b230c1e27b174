use crate::settings::{Settings, Strictness};
use crate::store::{self, StoreClient};
use crate::utils::{
    log_cleanup_delete_failed, log_cleanup_done, log_cleanup_lookup_failed, log_cleanup_post_kept,
    log_cleanup_start,
};
use anyhow::{bail, Result};

/// Outcome of the cleanup stage. Every delete call's result is recorded so
/// partial failures are visible instead of silently dropped.
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    pub matched: usize,
    pub deleted: usize,
    pub failures: Vec<String>,
}

pub fn lookup_query(settings: &Settings) -> Vec<(&'static str, String)> {
    vec![
        ("select", "id,content".to_string()),
        ("user_id", store::eq(&settings.fixture_user_id)),
        ("content", store::contains(&settings.fixture_marker)),
    ]
}

/// Removes leftover fixtures from a previous run, dependents first. A failed
/// lookup means there is nothing to clean; a failed delete is recorded and,
/// under strict cleanup, aborts the run.
pub async fn run(store: &StoreClient, settings: &Settings) -> Result<CleanupReport> {
    log_cleanup_start();

    let mut report = CleanupReport::default();

    let posts = match store.fetch_posts(&lookup_query(settings)).await {
        Ok(posts) => posts,
        Err(e) => {
            log_cleanup_lookup_failed(&e);
            return Ok(report);
        }
    };

    report.matched = posts.len();

    for post in &posts {
        // Comments and likes reference the post; they have to go first or
        // the store is left with orphaned rows.
        let mut dependents_removed = true;
        for table in ["comments", "likes"] {
            match store
                .delete_where(table, "post_id", store::eq(&post.id))
                .await
            {
                Ok(()) => {}
                Err(e) => {
                    let failure = format!("delete {} for post {}: {}", table, post.id, e);
                    log_cleanup_delete_failed(&failure);
                    if settings.strictness == Strictness::Strict {
                        bail!("strict cleanup aborted: {}", failure);
                    }
                    report.failures.push(failure);
                    dependents_removed = false;
                }
            }
        }

        // Deleting the post now would orphan whatever dependent rows
        // survived; keep the parent for the next run to retry.
        if !dependents_removed {
            log_cleanup_post_kept(&post.id);
            continue;
        }

        match store.delete_where("posts", "id", store::eq(&post.id)).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                let failure = format!("delete posts for post {}: {}", post.id, e);
                log_cleanup_delete_failed(&failure);
                if settings.strictness == Strictness::Strict {
                    bail!("strict cleanup aborted: {}", failure);
                }
                report.failures.push(failure);
            }
        }
    }

    log_cleanup_done(report.matched, report.deleted, report.failures.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Strictness, DEFAULT_FIXTURE_MARKER, DEFAULT_FIXTURE_USER_ID};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_settings(store_url: &str, strictness: Strictness) -> Settings {
        Settings {
            store_url: store_url.to_string(),
            service_key: "test-key".to_string(),
            fixture_user_id: DEFAULT_FIXTURE_USER_ID.to_string(),
            fixture_marker: DEFAULT_FIXTURE_MARKER.to_string(),
            strictness,
        }
    }

    async fn mount_lookup(server: &MockServer, rows: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(server)
            .await;
    }

    async fn mount_delete(server: &MockServer, resource: &str, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/rest/v1/{resource}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(server)
            .await;
    }

    #[test]
    fn test_lookup_scopes_to_sentinel_and_marker() {
        let settings = test_settings("https://example.supabase.co", Strictness::BestEffort);
        assert_eq!(
            lookup_query(&settings),
            vec![
                ("select", "id,content".to_string()),
                ("user_id", "eq.00000000-0000-0000-0000-000000000001".to_string()),
                ("content", "like.*fixture*".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_store_reports_zero() {
        let server = MockServer::start().await;
        mount_lookup(&server, json!([])).await;

        let settings = test_settings(&server.uri(), Strictness::BestEffort);
        let store = StoreClient::new(&settings);

        let report = run(&store, &settings).await.unwrap();
        assert_eq!(report.matched, 0);
        assert_eq!(report.deleted, 0);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_reports_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/posts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let settings = test_settings(&server.uri(), Strictness::BestEffort);
        let store = StoreClient::new(&settings);

        let report = run(&store, &settings).await.unwrap();
        assert_eq!(report.matched, 0);
        assert_eq!(report.deleted, 0);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_deletes_dependents_then_post() {
        let server = MockServer::start().await;
        mount_lookup(&server, json!([{"id": "post-1", "content": "☕ (fixture)"}])).await;
        mount_delete(&server, "comments", 204).await;
        mount_delete(&server, "likes", 204).await;
        mount_delete(&server, "posts", 204).await;

        let settings = test_settings(&server.uri(), Strictness::BestEffort);
        let store = StoreClient::new(&settings);

        let report = run(&store, &settings).await.unwrap();
        assert_eq!(report.matched, 1);
        assert_eq!(report.deleted, 1);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failed_dependent_delete_keeps_parent() {
        let server = MockServer::start().await;
        mount_lookup(&server, json!([{"id": "post-1", "content": "☕ (fixture)"}])).await;
        mount_delete(&server, "comments", 500).await;
        mount_delete(&server, "likes", 204).await;

        // The parent must not be deleted while its comment rows survive.
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/posts"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let settings = test_settings(&server.uri(), Strictness::BestEffort);
        let store = StoreClient::new(&settings);

        let report = run(&store, &settings).await.unwrap();
        assert_eq!(report.matched, 1);
        assert_eq!(report.deleted, 0);
        assert_eq!(report.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_strict_cleanup_aborts_on_failed_delete() {
        let server = MockServer::start().await;
        mount_lookup(&server, json!([{"id": "post-1", "content": "☕ (fixture)"}])).await;
        mount_delete(&server, "comments", 500).await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/posts"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let settings = test_settings(&server.uri(), Strictness::Strict);
        let store = StoreClient::new(&settings);

        assert!(run(&store, &settings).await.is_err());
    }
}
