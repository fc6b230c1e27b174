use crate::settings::Settings;
use crate::store;
use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

/// A post record ready to insert. Built only through [`NewPost::status`] and
/// [`NewPost::ordinary`] so a status post always carries an expiry and an
/// ordinary post never does.
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    user_id: String,
    content: String,
    latitude: f64,
    longitude: f64,
    address: String,
    category: String,
    is_status_post: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_expiry"
    )]
    expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_url: Option<String>,
}

fn serialize_expiry<S>(expiry: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match expiry {
        Some(t) => serializer.serialize_str(&store::timestamp(*t)),
        None => serializer.serialize_none(),
    }
}

impl NewPost {
    pub fn status(
        user_id: &str,
        content: String,
        latitude: f64,
        longitude: f64,
        address: &str,
        category: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            content,
            latitude,
            longitude,
            address: address.to_string(),
            category: category.to_string(),
            is_status_post: true,
            expires_at: Some(expires_at),
            audio_url: None,
        }
    }

    pub fn ordinary(
        user_id: &str,
        content: String,
        latitude: f64,
        longitude: f64,
        address: &str,
        category: &str,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            content,
            latitude,
            longitude,
            address: address.to_string(),
            category: category.to_string(),
            is_status_post: false,
            expires_at: None,
            audio_url: None,
        }
    }

    pub fn with_audio_url(mut self, url: String) -> Self {
        self.audio_url = Some(url);
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_status_post(&self) -> bool {
        self.is_status_post
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

/// The four fixtures the deletion job is validated against: two status posts
/// already past their expiry, one still active, one ordinary post the job
/// must never touch. Expiries are relative to `now` so the classification is
/// stable no matter when the harness runs.
pub fn fixture_set(settings: &Settings, now: DateTime<Utc>) -> Vec<NewPost> {
    let user = &settings.fixture_user_id;
    let marker = &settings.fixture_marker;

    vec![
        NewPost::status(
            user,
            format!("☕ Coffee break ({marker} expired 1)"),
            35.6812,
            139.7671,
            "Shibuya, Tokyo",
            "food",
            now - Duration::hours(1),
        )
        .with_audio_url(format!(
            "{}/storage/v1/object/public/audio/test_audio_1.m4a",
            settings.store_url
        )),
        NewPost::status(
            user,
            format!("🚶 Out for a walk ({marker} expired 2)"),
            35.6895,
            139.6917,
            "Shinjuku, Tokyo",
            "other",
            now - Duration::minutes(30),
        ),
        NewPost::status(
            user,
            format!("📚 Studying ({marker} active)"),
            35.6762,
            139.6503,
            "Setagaya, Tokyo",
            "other",
            now + Duration::hours(2),
        ),
        NewPost::ordinary(
            user,
            format!("An ordinary post ({marker})"),
            35.6812,
            139.7671,
            "Shibuya, Tokyo",
            "other",
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub expired: usize,
    pub active: usize,
    pub ordinary: usize,
}

/// Classifies fixtures the same way the verify queries partition the store:
/// expired status / active status / ordinary.
pub fn expected_partition(posts: &[NewPost], now: DateTime<Utc>) -> Partition {
    let mut partition = Partition {
        expired: 0,
        active: 0,
        ordinary: 0,
    };

    for post in posts {
        match (post.is_status_post, post.expires_at) {
            (true, Some(t)) if t < now => partition.expired += 1,
            (true, Some(_)) => partition.active += 1,
            _ => partition.ordinary += 1,
        }
    }

    partition
}
