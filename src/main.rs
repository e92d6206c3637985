use std::process::ExitCode;

use slurps_schedule_lib::app;
use slurps_schedule_lib::infrastructure::config::ServerConfig;

#[actix_web::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    app::init_tracing(&config);

    match app::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Schedule server exited with error");
            ExitCode::FAILURE
        }
    }
}
