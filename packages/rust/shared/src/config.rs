//! Runtime configuration for kibela-toc.
//!
//! Everything comes from the process environment, read once at startup into a
//! [`KibelaConfig`] that is then passed by reference. Core logic never reads
//! environment variables itself.

use std::fmt;

use url::Url;

use crate::error::{KibelaTocError, Result};

/// Env var holding the API access token.
pub const TOKEN_ENV: &str = "KIBELA_TOKEN";

/// Env var holding the team subdomain (`<team>.kibe.la`).
pub const TEAM_ENV: &str = "KIBELA_TEAM";

/// Optional env var overriding the GraphQL endpoint.
pub const ENDPOINT_ENV: &str = "KIBELA_ENDPOINT";

/// Default HTTP request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// KibelaConfig
// ---------------------------------------------------------------------------

/// Connection settings for the Kibela API.
#[derive(Clone)]
pub struct KibelaConfig {
    /// Bearer token. Never logged.
    pub token: String,
    /// Team subdomain.
    pub team: String,
    /// Team origin, e.g. `https://acme.kibe.la`. Note paths are resolved against it.
    pub origin: Url,
    /// GraphQL endpoint that receives every request.
    pub endpoint: Url,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for KibelaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KibelaConfig")
            .field("token", &"<redacted>")
            .field("team", &self.team)
            .field("origin", &self.origin.as_str())
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl KibelaConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = required(&lookup, TOKEN_ENV)?;
        let team = required(&lookup, TEAM_ENV)?;

        if !team
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(KibelaTocError::config(format!(
                "{TEAM_ENV} must be the bare team subdomain (letters, digits, '-'), got '{team}'"
            )));
        }

        let origin = Url::parse(&format!("https://{team}.kibe.la")).map_err(|e| {
            KibelaTocError::config(format!("cannot build API origin from {TEAM_ENV}: {e}"))
        })?;

        let endpoint = match lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            Some(raw) => Url::parse(raw.trim()).map_err(|e| {
                KibelaTocError::config(format!("{ENDPOINT_ENV} is not a valid URL: {e}"))
            })?,
            None => origin.join("/api/v1").map_err(|e| {
                KibelaTocError::config(format!("cannot build API endpoint: {e}"))
            })?,
        };

        tracing::debug!(%team, %endpoint, "configuration loaded");

        Ok(Self {
            token,
            team,
            origin,
            endpoint,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Absolute note URL for a public note number, as `noteFromPath` expects it.
    pub fn note_url(&self, number: &str) -> String {
        format!("{}/notes/{number}", self.origin.as_str().trim_end_matches('/'))
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    match lookup(name) {
        Some(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => Err(KibelaTocError::config(format!(
            "{TOKEN_ENV} and {TEAM_ENV} environment variables are required ({name} is not set)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn builds_default_endpoint_from_team() {
        let config =
            KibelaConfig::from_lookup(lookup_from(&[(TOKEN_ENV, "secret"), (TEAM_ENV, "acme")]))
                .expect("valid config");
        assert_eq!(config.endpoint.as_str(), "https://acme.kibe.la/api/v1");
        assert_eq!(config.note_url("42"), "https://acme.kibe.la/notes/42");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn endpoint_override() {
        let config = KibelaConfig::from_lookup(lookup_from(&[
            (TOKEN_ENV, "secret"),
            (TEAM_ENV, "acme"),
            (ENDPOINT_ENV, "http://127.0.0.1:9999/graphql"),
        ]))
        .expect("valid config");
        assert_eq!(config.endpoint.as_str(), "http://127.0.0.1:9999/graphql");
        // Note paths still resolve against the team origin.
        assert_eq!(config.note_url("7"), "https://acme.kibe.la/notes/7");
    }

    #[test]
    fn missing_token_is_config_error() {
        let err = KibelaConfig::from_lookup(lookup_from(&[(TEAM_ENV, "acme")])).unwrap_err();
        assert!(matches!(err, KibelaTocError::Config { .. }));
        assert!(err.to_string().contains("KIBELA_TOKEN is not set"));
    }

    #[test]
    fn empty_team_is_config_error() {
        let err = KibelaConfig::from_lookup(lookup_from(&[(TOKEN_ENV, "t"), (TEAM_ENV, "  ")]))
            .unwrap_err();
        assert!(err.to_string().contains("KIBELA_TEAM is not set"));
    }

    #[test]
    fn team_with_host_is_rejected() {
        let err = KibelaConfig::from_lookup(lookup_from(&[
            (TOKEN_ENV, "t"),
            (TEAM_ENV, "acme.kibe.la"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("bare team subdomain"));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = KibelaConfig::from_lookup(lookup_from(&[
            (TOKEN_ENV, "t"),
            (TEAM_ENV, "acme"),
            (ENDPOINT_ENV, "not a url"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("KIBELA_ENDPOINT"));
    }

    #[test]
    fn debug_redacts_token() {
        let config =
            KibelaConfig::from_lookup(lookup_from(&[(TOKEN_ENV, "supersecret"), (TEAM_ENV, "acme")]))
                .expect("valid config");
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("supersecret"));
        assert!(dbg.contains("<redacted>"));
    }
}
