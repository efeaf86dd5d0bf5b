// File: services/bookline_backend/src/main.rs
use axum::{routing::get, Router};
use bookline_common::logging::{init_with_level, level_from_str, log_error};
use bookline_config::load_config;
use bookline_gcal::{routes::routes as booking_routes, BookingState, EngineSettings};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod service_factory;

use service_factory::BooklineServiceFactory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config()?);
    init_with_level(level_from_str(config.log_level.as_deref()));

    let settings = EngineSettings::from_config(&config.gcal)?;
    info!(
        "Engine settings: ledger {}, {} minute slots, {:?} checks",
        settings.ledger.name(),
        settings.slot_duration.num_minutes(),
        settings.check_mode
    );

    let factory = BooklineServiceFactory::new(&config, &settings)
        .await
        .inspect_err(|e| log_error(e, "Failed to initialize calendar backend"))?;
    let state = Arc::new(BookingState::new(factory.calendar_service(), settings));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new()
        .route("/", get(|| async { "Welcome to the bookline API!" }))
        .merge(booking_routes(state))
        .merge(bookline_common::routes());

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use bookline_gcal::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Bookline API",
                version = "0.1.0",
                description = "Appointment availability and booking",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags( (name = "Bookline", description = "Core service endpoints")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /docs");

        let swagger_ui = SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
