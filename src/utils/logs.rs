use console::Style;

use crate::cleanup::CleanupReport;
use crate::fixtures::Partition;
use crate::seed::SeedReport;
use crate::settings::{Settings, Strictness};
use crate::store::PostRow;
use crate::verify::VerifyReport;

pub const TREE_BRANCH: char = '\u{251C}';
pub const TREE_END: char = '\u{2514}';
pub const TREE_HORIZ: char = '\u{2500}';

fn tree_branch() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_BRANCH, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_end() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_END, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

pub fn dim() -> Style {
    Style::new().dim()
}

fn blue() -> Style {
    Style::new().blue()
}

fn magenta() -> Style {
    Style::new().magenta()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

fn bold() -> Style {
    Style::new().bold()
}

fn init_prefix() -> String {
    blue().apply_to("[INIT]").to_string()
}

fn cleanup_prefix() -> String {
    yellow().apply_to("[CLEANUP]").to_string()
}

fn seed_prefix() -> String {
    magenta().apply_to("[SEED]").to_string()
}

fn verify_prefix() -> String {
    cyan().apply_to("[VERIFY]").to_string()
}

pub fn log_newline() {
    println!();
}

pub fn log_startup(settings: &Settings) {
    println!(
        "{} status-post fixture harness, target {}",
        init_prefix(),
        cyan().apply_to(&settings.store_url)
    );
    println!(
        "{} fixtures scoped to user {} marked {}",
        init_prefix(),
        dim().apply_to(&settings.fixture_user_id),
        dim().apply_to(format!("*{}*", settings.fixture_marker))
    );
    if settings.strictness == Strictness::Strict {
        println!(
            "{} cleanup is {}: any failed delete aborts the run",
            init_prefix(),
            yellow().apply_to("strict")
        );
    }
}

pub fn log_cleanup_start() {
    println!("{} removing leftover fixtures...", cleanup_prefix());
}

pub fn log_cleanup_lookup_failed(error: &str) {
    println!(
        "{} {} {}",
        cleanup_prefix(),
        red().apply_to("lookup failed:"),
        dim().apply_to(error)
    );
    println!("{} nothing to clean", cleanup_prefix());
}

pub fn log_cleanup_delete_failed(failure: &str) {
    println!(
        "{}{}",
        tree_branch(),
        red().apply_to(format!("failed {}", failure))
    );
}

pub fn log_cleanup_post_kept(post_id: &str) {
    println!(
        "{}{} post {} (dependent rows still present)",
        tree_branch(),
        yellow().apply_to("kept"),
        dim().apply_to(post_id)
    );
}

pub fn log_cleanup_done(matched: usize, deleted: usize, failures: usize) {
    if failures > 0 {
        println!(
            "{} removed {}{} posts ({} failed deletes)",
            cleanup_prefix(),
            bold().apply_to(deleted),
            dim().apply_to(format!("/{matched}")),
            red().apply_to(failures)
        );
    } else {
        println!(
            "{} removed {} posts",
            cleanup_prefix(),
            bold().apply_to(deleted)
        );
    }
}

pub fn log_seed_start() {
    println!("{} creating fixtures...", seed_prefix());
}

pub fn log_seed_created(content: &str, id: Option<&str>) {
    let id_info = match id {
        Some(id) => format!(" ({})", dim().apply_to(id)),
        None => String::new(),
    };
    println!(
        "{}{} {}{}",
        tree_branch(),
        green().apply_to("created"),
        content,
        id_info
    );
}

pub fn log_seed_failed(content: &str, error: &str) {
    println!(
        "{}{} {}: {}",
        tree_branch(),
        red().apply_to("failed"),
        content,
        dim().apply_to(error)
    );
}

pub fn log_seed_done(created: usize, total: usize) {
    println!(
        "{} created {}{} fixtures",
        seed_prefix(),
        bold().apply_to(created),
        dim().apply_to(format!("/{total}"))
    );
}

pub fn log_verify_start() {
    println!("{} pre-deletion snapshot...", verify_prefix());
}

pub fn log_verify_expired(rows: &[PostRow]) {
    println!(
        "{} expired status posts: {}",
        verify_prefix(),
        bold().apply_to(rows.len())
    );
    let count = rows.len();
    for (i, row) in rows.iter().enumerate() {
        let branch = if i == count - 1 { tree_end() } else { tree_branch() };
        let expiry = row.expires_at.as_deref().unwrap_or("-");
        println!(
            "{}{} (expires: {})",
            branch,
            row.content,
            dim().apply_to(expiry)
        );
    }
}

pub fn log_verify_count(label: &str, count: usize) {
    println!("{} {}: {}", verify_prefix(), label, bold().apply_to(count));
}

pub fn log_verify_query_failed(label: &str, error: &str) {
    println!(
        "{} {} {}: {}",
        verify_prefix(),
        red().apply_to("query failed for"),
        label,
        dim().apply_to(error)
    );
}

fn count_or_unknown(count: Option<usize>) -> String {
    match count {
        Some(n) => bold().apply_to(n).to_string(),
        None => red().apply_to("?").to_string(),
    }
}

pub fn log_summary(
    cleanup: &CleanupReport,
    seed: &SeedReport,
    verify: &VerifyReport,
    expected: Partition,
) {
    println!("{}", bold().apply_to("SUMMARY"));
    println!(
        "{}cleaned {} prior posts ({} failures)",
        tree_branch(),
        bold().apply_to(cleanup.deleted),
        cleanup.failures.len()
    );
    println!(
        "{}seeded {} fixtures ({} failures)",
        tree_branch(),
        bold().apply_to(seed.created),
        seed.failed
    );
    println!(
        "{}observed expired={} active={} ordinary={}",
        tree_branch(),
        count_or_unknown(verify.expired.as_ref().map(|rows| rows.len())),
        count_or_unknown(verify.active),
        count_or_unknown(verify.ordinary),
    );
    println!(
        "{}expected expired={} active={} ordinary={}",
        tree_end(),
        bold().apply_to(expected.expired),
        bold().apply_to(expected.active),
        bold().apply_to(expected.ordinary),
    );
    println!();
    println!("{}", dim().apply_to("next steps:"));
    println!(
        "{}",
        dim().apply_to("  1. run the auto-delete-status-posts job")
    );
    println!(
        "{}",
        dim().apply_to("  2. re-run the verify queries: expected expired=0 active=1 ordinary=1")
    );
}
