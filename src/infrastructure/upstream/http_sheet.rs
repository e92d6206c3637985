use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

use super::{SheetSource, CSV_ACCEPT};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::ServerConfig;

/// Fetches the published sheet over HTTP.
pub struct HttpSheetSource {
    client: Client,
    url: String,
}

impl HttpSheetSource {
    pub fn new(url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::new(
            config.upstream_url.clone(),
            &config.user_agent,
            config.fetch_timeout(),
        )
    }

}

fn request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout(format!("Upstream fetch timed out: {}", err))
    } else {
        AppError::Transport(format!("Upstream request failed: {}", err))
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch_csv(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, CSV_ACCEPT)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(request_error)?;
        debug!(bytes = text.len(), status = status.as_u16(), "Fetched upstream CSV");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use std::net::TcpListener;

    const USER_AGENT: &str = "slurps-schedule-test/1.0";

    /// Serve `status` + `body` on an ephemeral port and return its URL.
    fn spawn_upstream(status: u16, body: &'static str) -> String {
        serve(move || {
            web::route().to(move || async move {
                HttpResponse::build(actix_web::http::StatusCode::from_u16(status).unwrap())
                    .content_type("text/csv")
                    .body(body)
            })
        })
    }

    /// Upstream that answers with the Accept and User-Agent it received.
    fn spawn_echo_upstream() -> String {
        serve(|| {
            web::route().to(|req: HttpRequest| async move {
                let header = |name: &str| {
                    req.headers()
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string()
                };
                HttpResponse::Ok().body(format!("{}|{}", header("accept"), header("user-agent")))
            })
        })
    }

    fn serve<F>(route: F) -> String
    where
        F: Fn() -> actix_web::Route + Send + Clone + 'static,
    {
        let server = HttpServer::new(move || App::new().default_service(route()))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}/sheet.csv", addr)
    }

    fn unused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/sheet.csv", addr)
    }

    /// Listener that accepts connections but never answers. Keep it alive
    /// for as long as requests should hang.
    fn silent_upstream() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/sheet.csv", listener.local_addr().unwrap());
        (listener, url)
    }

    #[actix_web::test]
    async fn test_fetch_returns_body_on_success() {
        let url = spawn_upstream(200, "Day,Time,Location\nMon,9am,Main St\n");
        let source = HttpSheetSource::new(url, USER_AGENT, Duration::from_secs(5)).unwrap();

        let text = source.fetch_csv().await.unwrap();
        assert_eq!(text, "Day,Time,Location\nMon,9am,Main St\n");
    }

    #[actix_web::test]
    async fn test_fetch_sends_accept_and_user_agent() {
        let url = spawn_echo_upstream();
        let source = HttpSheetSource::new(url, USER_AGENT, Duration::from_secs(5)).unwrap();

        let echoed = source.fetch_csv().await.unwrap();
        assert_eq!(echoed, format!("{}|{}", CSV_ACCEPT, USER_AGENT));
    }

    #[actix_web::test]
    async fn test_fetch_maps_error_status() {
        let url = spawn_upstream(500, "boom");
        let source = HttpSheetSource::new(url, USER_AGENT, Duration::from_secs(5)).unwrap();

        let err = source.fetch_csv().await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 500 }));
    }

    #[actix_web::test]
    async fn test_fetch_maps_connection_failure() {
        let source =
            HttpSheetSource::new(unused_url(), USER_AGENT, Duration::from_secs(5)).unwrap();

        let err = source.fetch_csv().await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
        assert_eq!(err.upstream_status(), None);
    }

    #[actix_web::test]
    async fn test_fetch_maps_deadline_to_timeout() {
        let (_listener, url) = silent_upstream();
        let source = HttpSheetSource::new(url, USER_AGENT, Duration::from_secs(1)).unwrap();

        let err = source.fetch_csv().await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)), "unexpected error: {:?}", err);
        assert_eq!(err.upstream_status(), None);
    }
}
