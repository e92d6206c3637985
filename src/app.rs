use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::schedule_cache::ScheduleCache;
use crate::application::ScheduleUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::ServerConfig;
use crate::infrastructure::upstream::HttpSheetSource;
use crate::interfaces::http::{start_server, HttpState};

/// `RUST_LOG` wins over the configured filter.
pub fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn build_state(config: &ServerConfig) -> Result<HttpState> {
    let source = HttpSheetSource::from_config(config)?;
    let mut schedule = ScheduleUseCase::new(Arc::new(source));

    if let Some(ttl) = config.cache_ttl() {
        let cache = ScheduleCache::new(ttl);
        info!(ttl_secs = cache.ttl().as_secs(), "In-memory schedule cache enabled");
        schedule = schedule.with_cache(cache);
    }

    Ok(HttpState { schedule })
}

pub async fn run(config: ServerConfig) -> Result<()> {
    let state = build_state(&config)?;

    let server = start_server(&config, state).map_err(|err| {
        error!(
            error = %err,
            host = %config.host,
            port = config.port,
            "Failed to bind schedule server"
        );
        err
    })?;

    info!(
        address = %format!("http://{}:{}{}", config.host, config.port, config.endpoint_path),
        upstream = %config.upstream_url,
        "Schedule server started"
    );

    server.await?;
    info!("Schedule server stopped");
    Ok(())
}
