use crate::fixtures;
use crate::settings::Settings;
use crate::store::StoreClient;
use crate::utils::{log_seed_created, log_seed_done, log_seed_failed, log_seed_start};
use chrono::Utc;

#[derive(Debug, Clone, Copy, Default)]
pub struct SeedReport {
    pub created: usize,
    pub failed: usize,
}

/// Inserts the fixture set against one wall-clock "now". A failed insert is
/// logged with the store's response and counted; the remaining fixtures are
/// still attempted.
pub async fn run(store: &StoreClient, settings: &Settings) -> SeedReport {
    log_seed_start();

    let now = Utc::now();
    let posts = fixtures::fixture_set(settings, now);

    let mut report = SeedReport::default();

    for post in &posts {
        match store.create_post(post).await {
            Ok(id) => {
                report.created += 1;
                log_seed_created(post.content(), id.as_deref());
            }
            Err(e) => {
                report.failed += 1;
                log_seed_failed(post.content(), &e);
            }
        }
    }

    log_seed_done(report.created, posts.len());
    report
}
