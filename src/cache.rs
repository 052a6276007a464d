//! Keyed cache of fetched backend records.
//!
//! Keys are a scope plus optional parameters. Invalidating a scope-only key
//! covers every entry in that scope; a parameterised key only covers its own
//! entry. Covered scope-only entries are marked stale, covered parameterised
//! entries are dropped. Stale or expired entries are never served and are
//! pruned on the next insert.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::utils::time::now;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryScope {
    Applications,
    ApplicationDetail,
    InterviewSchedule,
    Applicants,
    ApplicantDetail,
    Jobs,
    DashboardStats,
    RecentApplications,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub scope: QueryScope,
    pub params: Option<String>,
}

impl QueryKey {
    pub fn scope(scope: QueryScope) -> Self {
        Self { scope, params: None }
    }

    pub fn with_params(scope: QueryScope, params: impl std::fmt::Display) -> Self {
        Self {
            scope,
            params: Some(params.to_string()),
        }
    }

    fn covers(&self, other: &QueryKey) -> bool {
        self.scope == other.scope && (self.params.is_none() || self.params == other.params)
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: JsonValue,
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
}

#[derive(Clone, Debug)]
pub struct QueryCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<QueryKey, CacheEntry>>>,
}

impl QueryCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.max(0)),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fresh cached value for `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key)?;
        if entry.stale || now() - entry.fetched_at >= self.ttl {
            return None;
        }
        match serde_json::from_value(entry.data.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(?key, error = %err, "cached entry does not match requested type");
                None
            }
        }
    }

    pub fn insert<T: Serialize>(&self, key: QueryKey, value: &T) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(?key, error = %err, "value not cacheable");
                return;
            }
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let ttl = self.ttl;
        let cutoff = now();
        entries.retain(|_, entry| !entry.stale && cutoff - entry.fetched_at < ttl);
        entries.insert(
            key,
            CacheEntry {
                data,
                fetched_at: now(),
                stale: false,
            },
        );
    }

    /// Invalidates every entry covered by any of `keys`. Parameterised
    /// entries are removed; scope-only entries stay behind, marked stale.
    pub fn invalidate(&self, keys: &[QueryKey]) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        let mut marked = 0usize;
        entries.retain(|key, entry| {
            if !keys.iter().any(|k| k.covers(key)) {
                return true;
            }
            if key.params.is_some() {
                return false;
            }
            entry.stale = true;
            marked += 1;
            true
        });
        let dropped = before - entries.len();
        tracing::debug!(keys = ?keys, marked, dropped, "cache invalidated");
    }

    /// Every applicant search plus every applicant detail.
    pub fn invalidate_applicants(&self) {
        self.invalidate(&[
            QueryKey::scope(QueryScope::Applicants),
            QueryKey::scope(QueryScope::ApplicantDetail),
        ]);
    }

    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.get::<T>(&key) {
            return Ok(hit);
        }
        let fresh = fetch().await?;
        self.insert(key, &fresh);
        Ok(fresh)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entry(&self, key: &QueryKey) -> Option<CacheEntry> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }
}
