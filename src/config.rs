// src/config.rs

//! Environment-supplied configuration.
//!
//! Source definitions live in the TOML config (`models::Config`); only the
//! destination-store credentials and the alert webhook come from the
//! environment.

use std::env;

use crate::error::{AppError, Result};

pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_OWNER: &str = "GITHUB_OWNER";
pub const ENV_REPO: &str = "GITHUB_REPO";
pub const ENV_ALERT_URL: &str = "ALERT_WEBHOOK_URL";

/// Destination-store credentials and identifiers.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
}

impl StoreConfig {
    /// Read the required variables from the process environment.
    ///
    /// All missing names are reported together so a misconfigured job can
    /// be fixed in one pass.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut read = |name: &str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => {
                missing.push(name.to_string());
                None
            }
        };

        let token = read(ENV_TOKEN);
        let owner = read(ENV_OWNER);
        let repo = read(ENV_REPO);

        match (token, owner, repo) {
            (Some(token), Some(owner), Some(repo)) => Ok(Self { token, owner, repo }),
            _ => Err(AppError::Env { missing }),
        }
    }
}

/// Optional alert webhook URL.
pub fn alert_webhook_from_env() -> Option<String> {
    env::var(ENV_ALERT_URL).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_from_lookup_complete() {
        let vars = HashMap::from([
            (ENV_TOKEN, "ghp_x"),
            (ENV_OWNER, "harborsnow"),
            (ENV_REPO, "conditions-data"),
        ]);
        let store = StoreConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(store.owner, "harborsnow");
        assert_eq!(store.repo, "conditions-data");
    }

    #[test]
    fn test_from_lookup_lists_all_missing() {
        let vars = HashMap::from([(ENV_OWNER, "harborsnow")]);
        let error = StoreConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        match error {
            AppError::Env { missing } => {
                assert_eq!(missing, vec![ENV_TOKEN.to_string(), ENV_REPO.to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_lookup_blank_counts_as_missing() {
        let vars = HashMap::from([
            (ENV_TOKEN, "  "),
            (ENV_OWNER, "harborsnow"),
            (ENV_REPO, "conditions-data"),
        ]);
        assert!(StoreConfig::from_lookup(lookup_from(&vars)).is_err());
    }
}
