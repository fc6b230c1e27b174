use anyhow::{anyhow, Result};

/// How cleanup reacts to a failed delete call. Best-effort logs and keeps
/// going; strict aborts the whole run so partial cleanup never goes unnoticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    BestEffort,
    Strict,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub store_url: String,
    pub service_key: String,
    pub fixture_user_id: String,
    pub fixture_marker: String,
    pub strictness: Strictness,
}

pub const DEFAULT_FIXTURE_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
pub const DEFAULT_FIXTURE_MARKER: &str = "fixture";

impl Settings {
    pub fn from_env() -> Result<Self> {
        let store_url = std::env::var("SUPABASE_URL")
            .map_err(|_| anyhow!("SUPABASE_URL not set"))?
            .trim_end_matches('/')
            .to_string();
        let service_key =
            std::env::var("SERVICE_ROLE_KEY").map_err(|_| anyhow!("SERVICE_ROLE_KEY not set"))?;
        let fixture_user_id = std::env::var("FIXTURE_USER_ID")
            .unwrap_or_else(|_| DEFAULT_FIXTURE_USER_ID.to_string());
        let fixture_marker =
            std::env::var("FIXTURE_MARKER").unwrap_or_else(|_| DEFAULT_FIXTURE_MARKER.to_string());
        let strictness = std::env::var("CLEANUP_STRICT")
            .map(|v| parse_strict(&v))
            .unwrap_or(Strictness::BestEffort);

        Ok(Self {
            store_url,
            service_key,
            fixture_user_id,
            fixture_marker,
            strictness,
        })
    }
}

pub fn parse_strict(value: &str) -> Strictness {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "strict" => Strictness::Strict,
        _ => Strictness::BestEffort,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict_flags() {
        assert_eq!(parse_strict("1"), Strictness::Strict);
        assert_eq!(parse_strict("true"), Strictness::Strict);
        assert_eq!(parse_strict("STRICT"), Strictness::Strict);
        assert_eq!(parse_strict("0"), Strictness::BestEffort);
        assert_eq!(parse_strict("false"), Strictness::BestEffort);
        assert_eq!(parse_strict(""), Strictness::BestEffort);
    }
}
