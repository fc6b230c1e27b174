mod cleanup;
mod fixtures;
mod seed;
mod settings;
mod store;
mod verify;
pub mod utils;

use anyhow::Result;
use chrono::Utc;
use settings::Settings;
use store::StoreClient;
use utils::{log_newline, log_startup, log_summary};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    log_startup(&settings);
    log_newline();

    let store = StoreClient::new(&settings);

    // Strictly sequential: cleanup must converge before seeding, seeding
    // before the snapshot. The only fatal path is strict-mode cleanup.
    let cleanup_report = cleanup::run(&store, &settings).await?;
    log_newline();

    let seed_report = seed::run(&store, &settings).await;
    log_newline();

    let verify_report = verify::run(&store, &settings).await;
    log_newline();

    let now = Utc::now();
    let expected = fixtures::expected_partition(&fixtures::fixture_set(&settings, now), now);
    log_summary(&cleanup_report, &seed_report, &verify_report, expected);

    Ok(())
}
