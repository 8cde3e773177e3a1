use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use crate::generation::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::records::DEFAULT_LATENCY;

pub const DEFAULT_DATA_DIR: &str = "jarvis-data";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub record_latency: Duration,
}

impl Config {
    /// Flags win over the process environment; everything else has a default.
    pub fn from_env(data_dir: Option<PathBuf>) -> Result<Self> {
        Self::resolve(data_dir, |name| env::var(name).ok())
    }

    pub fn resolve(
        data_dir: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let data_dir = data_dir
            .or_else(|| lookup("JARVIS_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let api_key = lookup("API_KEY").or_else(|| lookup("GEMINI_API_KEY"));
        let model = lookup("JARVIS_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        let api_base = lookup("JARVIS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_owned());

        let request_timeout = match lookup("JARVIS_TIMEOUT_SECONDS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("JARVIS_TIMEOUT_SECONDS must be whole seconds, got {raw:?}"))?,
            ),
            None => DEFAULT_TIMEOUT,
        };
        let record_latency = match lookup("JARVIS_RECORD_LATENCY_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .with_context(|| format!("JARVIS_RECORD_LATENCY_MS must be milliseconds, got {raw:?}"))?,
            ),
            None => DEFAULT_LATENCY,
        };

        Ok(Self {
            data_dir,
            api_key,
            model,
            api_base,
            request_timeout,
            record_latency,
        })
    }

    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("failed to create HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::{Config, DEFAULT_DATA_DIR, DEFAULT_TIMEOUT};
    use crate::generation::DEFAULT_MODEL;

    fn resolve(data_dir: Option<PathBuf>, vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Config::resolve(data_dir, |name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = resolve(None, &[]).expect("defaults should resolve");
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.record_latency, Duration::from_millis(50));
    }

    #[test]
    fn flag_beats_environment_and_key_falls_back() {
        let config = resolve(
            Some(PathBuf::from("/tmp/flag")),
            &[
                ("JARVIS_DATA_DIR", "/tmp/env"),
                ("API_KEY", "  "),
                ("GEMINI_API_KEY", "g-key"),
                ("JARVIS_RECORD_LATENCY_MS", "0"),
            ],
        )
        .expect("config should resolve");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/flag"));
        assert_eq!(config.api_key.as_deref(), Some("g-key"));
        assert_eq!(config.record_latency, Duration::ZERO);
    }

    #[test]
    fn malformed_timeout_is_reported() {
        let error = resolve(None, &[("JARVIS_TIMEOUT_SECONDS", "soon")])
            .expect_err("non-numeric timeout should fail");
        assert!(error.to_string().contains("JARVIS_TIMEOUT_SECONDS"));
    }
}
