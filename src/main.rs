use log::*;
use service::config::Config;
use service::logging::Logger;
use service::AppState;
use std::sync::Arc;
use web::router::define_routes;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let interface = config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = config.port;

    let db = match service::init_database(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(config, &Arc::new(db));
    let router = define_routes(app_state);

    let addr = format!("{interface}:{port}");
    info!("MeetNotes API server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server exited with error: {e}");
        std::process::exit(1);
    }
}
