use super::{error::ApiError, routes::sync_routes};
use crate::{error::CliError, settings::Settings, shutdown::ShutdownCoordinator};
use axum::{
    Router,
    response::{IntoResponse, Response},
};
use engine_core::{error::SyncError, orchestrator::SyncService};
use std::any::Any;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Full application router: sync endpoints with panic recovery, CORS and
/// request tracing.
pub fn build_router(service: SyncService, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    sync_routes(service, body_limit)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// A handler panic becomes an `Internal` error with the usual JSON shape.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic payload".to_string());

    ApiError::from(SyncError::Internal(format!("Request handler panicked: {detail}")))
        .into_response()
}

pub async fn serve(
    settings: &Settings,
    service: SyncService,
    shutdown: ShutdownCoordinator,
) -> Result<(), CliError> {
    let addr = settings.socket_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!(
        %addr,
        chunk_size = settings.chunk_size,
        max_body_bytes = settings.max_body_bytes,
        "Omega sync service listening"
    );

    axum::serve(listener, build_router(service, settings.max_body_bytes))
        .with_graceful_shutdown(shutdown.wait())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
