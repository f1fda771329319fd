use std::net::SocketAddr;

use devproxy::config::DevConfig;
use devproxy::routes;
use devproxy::state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = DevConfig::from_env().expect("invalid dev proxy configuration");
    let table = config.table().expect("invalid proxy table");
    for route in table.iter() {
        tracing::info!(
            prefix = route.prefix(),
            target = route.target(),
            change_origin = route.change_origin(),
            "proxy route"
        );
    }
    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "serving static files for unproxied paths");
    }

    let state = AppState::new(table, config.timeout, config.max_body_bytes).expect("http client init failed");
    let app = routes::app(state, config.static_dir.clone());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "devproxy listening");
    axum::serve(listener, app).await.expect("server failed");
}
