mod config;
mod dataset;
mod db;
mod rate_limit;
mod routes;
mod services;
mod state;
mod store;

use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let course_data = dataset::load(&config).expect("course dataset failed to load");

    let comments = store::from_config(&config);
    let cooldown = rate_limit::PostCooldown::from_env();
    tracing::info!(
        store = ?config.store,
        relation = %config.comments_relation(),
        cooldown_secs = cooldown.window().whole_seconds(),
        "comment store configured"
    );
    if config.store == config::StoreKind::Postgres && config.database_url.is_none() {
        tracing::warn!("DATABASE_URL not set; comment requests will fail until it is configured");
    }

    let state = state::AppState::new(course_data, comments, cooldown);
    let app = routes::app(state, &config);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "course site listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server failed");
}
