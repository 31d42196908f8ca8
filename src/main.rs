mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StoreConfig};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::spots::{
    routes as spots_routes, BookingService, ListingService, SpotCache, SpotRepository, SpotsState,
};
use crate::modules::geocoder::NominatimGeocoder;
use crate::modules::store::{InMemorySpotStore, PgSpotStore, PostgrestSpotStore, SpotStore};
use crate::shared::geo::GeoFence;
use axum::Router;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

/// Open the configured spot store
async fn connect_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn SpotStore>> {
    let store: Arc<dyn SpotStore> = match config {
        StoreConfig::Postgrest(postgrest) => Arc::new(
            PostgrestSpotStore::new(postgrest)
                .map_err(|e| anyhow::anyhow!("Failed to create spot store client: {}", e))?,
        ),
        StoreConfig::Postgres(database) => {
            let pool = database::connect(database).await?;
            Arc::new(PgSpotStore::new(pool))
        }
        StoreConfig::Memory => {
            tracing::warn!("Using the in-memory spot store; listings are lost on restart");
            Arc::new(InMemorySpotStore::new())
        }
    };

    tracing::info!(
        "Spot store initialized (kind: {:?}, backend: {})",
        config.kind(),
        store.backend_name()
    );
    Ok(store)
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    let store = connect_store(&config.store).await?;

    let geocoder = Arc::new(
        NominatimGeocoder::new(&config.geocoder)
            .map_err(|e| anyhow::anyhow!("Failed to create geocoder client: {}", e))?,
    );
    tracing::info!("Geocoder initialized ({})", config.geocoder.base_url);

    // Single shared read cache, invalidated by every write
    let cache = Arc::new(SpotCache::new(config.cache.spots_ttl));
    let cache_ttl = cache.ttl();
    let repository = Arc::new(SpotRepository::new(store, cache, GeoFence::BANGALORE));
    let listing_service = Arc::new(ListingService::new(Arc::clone(&repository), geocoder));
    let booking_service = Arc::new(BookingService::new(Arc::clone(&repository)));
    tracing::info!("Spot services initialized (cache ttl: {:?})", cache_ttl);

    let spots_state = SpotsState {
        repository,
        listing: listing_service,
        booking: booking_service,
    };

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(spots_routes::routes(spots_state))
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
