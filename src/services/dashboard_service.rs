use std::sync::Arc;

use crate::backend::Backend;
use crate::cache::{QueryCache, QueryKey, QueryScope};
use crate::error::Result;
use crate::models::stats::{DashboardStats, RecentApplication};

pub const DEFAULT_RECENT_LIMIT: u32 = 10;
pub const MAX_RECENT_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct DashboardService {
    backend: Arc<dyn Backend>,
    cache: QueryCache,
}

impl DashboardService {
    pub fn new(backend: Arc<dyn Backend>, cache: QueryCache) -> Self {
        Self { backend, cache }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let backend = self.backend.clone();
        self.cache
            .get_or_fetch(QueryKey::scope(QueryScope::DashboardStats), || async move {
                backend.dashboard_stats().await
            })
            .await
    }

    pub async fn recent(&self, limit: Option<u32>) -> Result<Vec<RecentApplication>> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);
        let backend = self.backend.clone();
        self.cache
            .get_or_fetch(
                QueryKey::with_params(QueryScope::RecentApplications, limit),
                || async move { backend.recent_applications(limit).await },
            )
            .await
    }
}
