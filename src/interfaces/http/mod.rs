use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, ResponseError};
use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::ScheduleUseCase;
use crate::domain::error::AppError;
use crate::infrastructure::config::ServerConfig;

/// Edge caches serve a copy for 5 minutes, then stale for 10 more while revalidating.
pub const SCHEDULE_CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate=600";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub const UPSTREAM_FAILED: &str = "Upstream schedule fetch failed";
pub const SCHEDULE_UNAVAILABLE: &str = "Schedule unavailable";

pub struct HttpState {
    pub schedule: ScheduleUseCase,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    /// Only the upstream status is exposed; other details stay in the logs.
    fn error_response(&self) -> HttpResponse {
        let body = match self.upstream_status() {
            Some(status) => ErrorBody {
                error: UPSTREAM_FAILED,
                status: Some(status),
            },
            None => ErrorBody {
                error: SCHEDULE_UNAVAILABLE,
                status: None,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

async fn schedule(
    req: HttpRequest,
    data: web::Data<HttpState>,
) -> Result<HttpResponse, AppError> {
    let span = info_span!(
        "schedule_request",
        request_id = %Uuid::new_v4(),
        method = %req.method(),
    );

    async move {
        let feed = match data.schedule.execute().await {
            Ok(feed) => feed,
            Err(err) => {
                match &err {
                    AppError::Upstream { status } => {
                        warn!(status = *status, "Upstream schedule fetch failed")
                    }
                    other => error!(error = %other, "Schedule unavailable"),
                }
                return Err(err);
            }
        };

        let body = serde_json::to_string(feed.items.as_slice())
            .map_err(|e| AppError::Internal(format!("Failed to serialize schedule: {}", e)))?;

        info!(
            items = feed.items.len(),
            from_cache = feed.from_cache,
            "Schedule served"
        );

        Ok(HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, JSON_CONTENT_TYPE))
            .insert_header((CACHE_CONTROL, SCHEDULE_CACHE_CONTROL))
            .body(body))
    }
    .instrument(span)
    .await
}

/// Mount the schedule endpoint at `path` for every HTTP method.
pub fn configure(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::route().to(schedule)));
}

pub fn start_server(config: &ServerConfig, state: HttpState) -> std::io::Result<Server> {
    let state = web::Data::new(state);
    let path = config.endpoint_path.clone();
    let cors_permissive = config.cors_permissive;

    let server = HttpServer::new(move || {
        let cors = if cors_permissive {
            Cors::permissive()
        } else {
            Cors::default()
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(|cfg| configure(cfg, &path))
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}
