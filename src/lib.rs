pub mod backend;
pub mod cache;
pub mod config;
pub mod dto;
pub mod error;
pub mod filter;
pub mod middleware;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::backend::Backend;
use crate::cache::QueryCache;
use crate::config::Config;
use crate::middleware::rate_limit::RateLimiter;
use crate::services::{
    admin_service::AdminService, applicant_service::ApplicantService,
    application_service::ApplicationService, dashboard_service::DashboardService,
    job_service::JobService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn Backend>,
    pub cache: QueryCache,
    pub rate_limiter: RateLimiter,
    pub application_service: ApplicationService,
    pub applicant_service: ApplicantService,
    pub job_service: JobService,
    pub dashboard_service: DashboardService,
    pub admin_service: AdminService,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn Backend>) -> Self {
        let cache = QueryCache::new(config.cache_ttl_secs);

        let application_service = ApplicationService::new(backend.clone(), cache.clone());
        let applicant_service =
            ApplicantService::new(backend.clone(), cache.clone(), config.storage_bucket.clone());
        let job_service = JobService::new(backend.clone(), cache.clone());
        let dashboard_service = DashboardService::new(backend.clone(), cache.clone());
        let admin_service = AdminService::new(backend.clone());
        let rate_limiter = RateLimiter::new(config.admin_rps);

        Self {
            config: Arc::new(config),
            backend,
            cache,
            rate_limiter,
            application_service,
            applicant_service,
            job_service,
            dashboard_service,
            admin_service,
        }
    }
}
