use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8108";
pub const DEFAULT_COLLECTION: &str = "typesense_docs";
pub const DEFAULT_CONVERSATION_MODEL_ID: &str = "conv-model-1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone)]
pub struct Config {
    /// Base URL of the search server, without trailing slash
    pub base_url: String,
    pub api_key: String,
    pub collection: String,
    pub conversation_model_id: String,
    /// Per-request timeout, 0 disables it
    pub timeout_secs: u64,
    /// Address the HTTP proxy listens on
    pub bind_addr: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("collection", &self.collection)
            .field("conversation_model_id", &self.conversation_model_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("TYPESENSE_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("TYPESENSE_API_KEY environment variable not set"))?;

        let base_url = lookup("TYPESENSE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match lookup("ASKDOCS_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow!("ASKDOCS_TIMEOUT_SECS must be a whole number, got {:?}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            api_key,
            collection: lookup("TYPESENSE_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            conversation_model_id: lookup("TYPESENSE_CONVERSATION_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_CONVERSATION_MODEL_ID.to_string()),
            timeout_secs,
            bind_addr: lookup("ASKDOCS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
