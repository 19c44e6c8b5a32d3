// src/config.rs

//! Environment-provided credentials and overrides.
//!
//! Secrets never live in the TOML file. They are read from the process
//! environment once at startup and passed to the components that need them.

use crate::models::Config;
use crate::utils::mask_secret;

pub const API_KEY_VAR: &str = "COINMARKETCAP_API_KEY";
pub const AWS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SINK_TOKEN_VAR: &str = "LOGGLY_TOKEN";
pub const REGION_VAR: &str = "AWS_REGION";
pub const TABLE_VAR: &str = "DYNAMODB_TABLE";
pub const INTERVAL_VAR: &str = "POLL_INTERVAL_SECS";

/// Credentials read from the environment. Blank values are `None`.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub sink_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked = |v: &Option<String>| v.as_deref().map(mask_secret);
        f.debug_struct("Credentials")
            .field("api_key", &masked(&self.api_key))
            .field("aws_access_key_id", &masked(&self.aws_access_key_id))
            .field("aws_secret_access_key", &masked(&self.aws_secret_access_key))
            .field("sink_token", &masked(&self.sink_token))
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| non_blank(lookup(name));
        Self {
            api_key: get(API_KEY_VAR),
            aws_access_key_id: get(AWS_KEY_ID_VAR),
            aws_secret_access_key: get(AWS_SECRET_VAR),
            sink_token: get(SINK_TOKEN_VAR),
        }
    }

    /// Describe every credential as loaded or missing.
    pub fn report(&self) -> EnvReport {
        let entry = |var: &'static str, value: &Option<String>| EnvEntry {
            var,
            masked: value.as_deref().map(mask_secret),
        };
        EnvReport {
            entries: vec![
                entry(AWS_KEY_ID_VAR, &self.aws_access_key_id),
                entry(AWS_SECRET_VAR, &self.aws_secret_access_key),
                entry(SINK_TOKEN_VAR, &self.sink_token),
                entry(API_KEY_VAR, &self.api_key),
            ],
        }
    }
}

/// One line of the credential report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub var: &'static str,
    pub masked: Option<String>,
}

/// Startup diagnostic for credentials. Never a gate.
#[derive(Debug, Clone)]
pub struct EnvReport {
    pub entries: Vec<EnvEntry>,
}

impl EnvReport {
    pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .filter(|e| e.masked.is_none())
            .map(|e| e.var)
    }

    pub fn is_complete(&self) -> bool {
        self.missing().next().is_none()
    }

    /// Emit the report through the `log` facade.
    pub fn log(&self) {
        for entry in &self.entries {
            match &entry.masked {
                Some(masked) => log::info!("{}: {}", entry.var, masked),
                None => log::warn!("No {} loaded", entry.var),
            }
        }
    }
}

/// Apply non-secret environment overrides on top of file configuration.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(region) = non_blank(lookup(REGION_VAR)) {
        config.store.region = region;
    }
    if let Some(table) = non_blank(lookup(TABLE_VAR)) {
        config.store.table = table;
    }
    if let Some(raw) = non_blank(lookup(INTERVAL_VAR)) {
        match raw.parse::<u64>() {
            Ok(secs) => config.poll.interval_secs = secs,
            Err(e) => log::warn!("Ignoring {}={:?}: {}", INTERVAL_VAR, raw, e),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_blank_values_are_missing() {
        let creds = Credentials::from_lookup(lookup(&[
            (API_KEY_VAR, "abcd-1234-efgh"),
            (SINK_TOKEN_VAR, "   "),
        ]));

        assert_eq!(creds.api_key.as_deref(), Some("abcd-1234-efgh"));
        assert!(creds.sink_token.is_none());

        let report = creds.report();
        let missing: Vec<_> = report.missing().collect();
        assert_eq!(missing, vec![AWS_KEY_ID_VAR, AWS_SECRET_VAR, SINK_TOKEN_VAR]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_report_masks_secrets() {
        let creds = Credentials::from_lookup(lookup(&[(AWS_SECRET_VAR, "supersecretvalue")]));
        let report = creds.report();
        let secret = report
            .entries
            .iter()
            .find(|e| e.var == AWS_SECRET_VAR)
            .unwrap();
        assert_eq!(secret.masked.as_deref(), Some("supe****"));
        assert!(!format!("{:?}", creds).contains("supersecretvalue"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                (REGION_VAR, "eu-west-1"),
                (TABLE_VAR, "coins"),
                (INTERVAL_VAR, "30"),
            ]),
        );
        assert_eq!(config.store.region, "eu-west-1");
        assert_eq!(config.store.table, "coins");
        assert_eq!(config.poll.interval_secs, 30);
    }

    #[test]
    fn test_bad_interval_override_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, lookup(&[(INTERVAL_VAR, "soon")]));
        assert_eq!(config.poll.interval_secs, 21_600);
    }
}
