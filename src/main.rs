use std::net::SocketAddr;
use std::sync::Arc;

use recruitment_admin::{
    backend::{memory::InMemoryBackend, supabase::SupabaseBackend, Backend},
    config::{get_config, init_config, BackendMode},
    routes, AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    init_config()?;
    let config = get_config();

    let backend: Arc<dyn Backend> = match config.backend_mode {
        BackendMode::Supabase => {
            info!(url = %config.backend_url, "using Supabase backend");
            Arc::new(SupabaseBackend::new(
                &config.backend_url,
                config.backend_api_key.clone(),
                config.backend_timeout_secs,
            )?)
        }
        BackendMode::Memory => {
            tracing::warn!("using in-memory backend; data is lost on restart");
            Arc::new(InMemoryBackend::new())
        }
    };

    let app_state = AppState::new(config.clone(), backend);
    let app = routes::build_router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
