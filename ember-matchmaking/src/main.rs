use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ember_matchmaking::config::AppConfig;
use ember_matchmaking::registration::SessionStore;
use ember_matchmaking::repo::Repositories;
use ember_matchmaking::{routes, AppState};
use ember_shared::clients::db;
use ember_shared::clients::geocoding::GeocodingClient;
use ember_shared::clients::rabbitmq::RabbitMQClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ember_shared::telemetry::init_tracing("ember-matchmaking");

    let config = AppConfig::load()?;
    let port = config.port;

    let pool = db::create_pool(&config.database_url)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let resolver = GeocodingClient::new(&config.geocoding_url, config.geocoding_timeout_ms)
        .map_err(|e| anyhow::anyhow!(e))?;

    let state = Arc::new(AppState {
        repos: Repositories::postgres(pool),
        sessions: SessionStore::new(),
        resolver: Arc::new(resolver),
        rabbitmq,
        config,
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/registration/:identity/start",
            post(routes::registration::start_registration),
        )
        .route(
            "/registration/:identity/input",
            post(routes::registration::submit_input),
        )
        .route("/profiles/:identity", get(routes::profile::get_profile))
        .route("/browse/:identity/next", get(routes::browse::next_candidate))
        .route("/reactions", post(routes::reactions::react))
        .route("/matches/:identity", get(routes::matches::list_matches))
        .route("/filters/:identity", get(routes::filters::get_filters))
        .route("/filters/:identity/targets", put(routes::filters::set_targets))
        .route("/filters/:identity/distance", put(routes::filters::set_distance))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "ember-matchmaking starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
