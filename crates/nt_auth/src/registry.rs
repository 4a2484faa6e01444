use chrono::{DateTime, Utc};
use nt_core::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::generator::ApiKeyGenerator;
use crate::limiter::{RateDecision, RateLimiter};

pub const DEFAULT_ISSUED_LIMIT: u32 = 100;
pub const CONFIGURED_KEY_LIMIT: u32 = 1000;
pub const DEV_KEY_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRecord {
    #[serde(skip_serializing)]
    pub key: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub rate_limit_per_hour: u32,
    pub requests_this_hour: u32,
    pub window_start: DateTime<Utc>,
    pub is_dev: bool,
}

impl ApiKeyRecord {
    fn new(key: String, name: String, rate_limit_per_hour: u32, is_dev: bool) -> Self {
        let now = Utc::now();
        Self {
            key,
            name,
            created_at: now,
            rate_limit_per_hour,
            requests_this_hour: 0,
            window_start: now,
            is_dev,
        }
    }
}

/// In-memory API key table. Cloning hands out another handle to the same
/// table; every mutation goes through one registry-wide lock.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    records: Arc<RwLock<HashMap<String, ApiKeyRecord>>>,
    generator: ApiKeyGenerator,
    limiter: RateLimiter,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limiter(limiter: RateLimiter) -> Self {
        Self {
            limiter,
            ..Self::default()
        }
    }

    pub fn generator(&self) -> &ApiKeyGenerator {
        &self.generator
    }

    /// Issues a key with the default hourly limit.
    pub async fn issue(&self, name: &str) -> Result<String> {
        self.issue_with_limit(name, DEFAULT_ISSUED_LIMIT).await
    }

    pub async fn issue_with_limit(&self, name: &str, rate_limit_per_hour: u32) -> Result<String> {
        if rate_limit_per_hour == 0 {
            return Err(Error::InvalidValue(
                "rate limit per hour must be positive".to_string(),
            ));
        }
        let key = self.generator.generate();
        let record = ApiKeyRecord::new(key.clone(), name.to_string(), rate_limit_per_hour, false);
        self.records.write().await.insert(key.clone(), record);
        info!(name, limit = rate_limit_per_hour, "🔑 Issued API key");
        Ok(key)
    }

    pub async fn revoke(&self, key: &str) -> bool {
        let removed = self.records.write().await.remove(key);
        if let Some(record) = &removed {
            info!(name = %record.name, "🗑️ Revoked API key");
        }
        removed.is_some()
    }

    pub async fn lookup(&self, key: &str) -> Option<ApiKeyRecord> {
        self.records.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Loads keys from configuration. When nothing usable was configured
    /// outside production, a development key is generated and returned; it
    /// is also logged once since there is no other way to retrieve it.
    pub async fn bootstrap(&self, entries: &[String], production: bool) -> Option<String> {
        let mut records = self.records.write().await;
        let mut loaded = 0;
        for (index, entry) in entries.iter().enumerate() {
            let key = entry.trim();
            if key.is_empty() {
                continue;
            }
            if records.contains_key(key) {
                warn!(
                    key = %self.generator.mask_key(key),
                    "Ignoring duplicate API key at position {}",
                    index + 1
                );
                continue;
            }
            let name = format!("key_{}", index + 1);
            records.insert(
                key.to_string(),
                ApiKeyRecord::new(key.to_string(), name, CONFIGURED_KEY_LIMIT, false),
            );
            loaded += 1;
        }

        if loaded > 0 {
            info!("🔑 Loaded {} API key(s) from configuration", loaded);
        }
        if !records.is_empty() {
            return None;
        }
        if production {
            warn!("No API keys configured in production mode");
            return None;
        }

        let key = self.generator.generate();
        records.insert(
            key.clone(),
            ApiKeyRecord::new(key.clone(), "development".to_string(), DEV_KEY_LIMIT, true),
        );
        warn!("⚠️ No API keys configured. Generated development key: {}", key);
        Some(key)
    }

    /// Looks up `key` and runs the limiter against it under the write lock.
    /// Returns `None` for unknown keys, otherwise the decision together with
    /// a snapshot of the record taken after the check.
    pub async fn admit(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Option<(RateDecision, ApiKeyRecord)> {
        let mut records = self.records.write().await;
        let record = records.get_mut(key)?;
        let decision = self.limiter.check(record, now);
        Some((decision, record.clone()))
    }
}
