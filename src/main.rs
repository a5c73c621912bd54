use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use prompt_image_api::{api, azure, build_services, config, utils};

#[tokio::main]
async fn main() {
    // Load configuration and prepare the data directory
    config::Config::dotenv_load();
    let config = config::Config::new().expect("Failed to load configuration");
    let paths = utils::paths::PathManager::new(config.data_dir.clone());
    paths
        .ensure_directories()
        .expect("Failed to create data directories");

    // Initialize tracing
    utils::logging::init(&paths.log_dir()).expect("Failed to initialise logging");
    config.log_summary();

    // Missing credentials are fatal here
    let generator = Arc::new(
        azure::AzureClient::new(&config, &paths).expect("Failed to create Azure OpenAI client"),
    );
    let (prompt_service, image_service) = build_services(&config, &paths, generator);
    let state = Arc::new(api::AppState {
        prompt_service,
        image_service,
    });

    let app = api::build_router(state).layer(CorsLayer::permissive());

    // Run our application with safe parsing
    let host_str = config.api_host.clone();
    let port_str = config.api_port.clone();
    let ip: std::net::IpAddr = host_str.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_HOST '{}', falling back to 127.0.0.1", host_str);
        std::net::IpAddr::from([127, 0, 0, 1])
    });
    let port: u16 = port_str.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_PORT '{}', falling back to 8000", port_str);
        8000
    });
    let socket_address = SocketAddr::new(ip, port);
    tracing::info!("listening on {}", socket_address);
    axum::Server::bind(&socket_address)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
