use std::sync::Arc;

use actix_web::{App, HttpServer, web::Data};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use vet_appointments::config::AppConfig;
use vet_appointments::openapi::ApiDoc;
use vet_appointments::store::{AppointmentStore, MongoStore};

/// Veterinary Appointments Service Entry Point
///
/// Configures and launches the Actix-web HTTP server with:
/// - Appointment lifecycle endpoints under `/api/v1/appointments`
/// - Swagger UI for API documentation
/// - Environment configuration via `.env` file
/// - A MongoDB-backed store injected as shared application state
///
/// # Endpoints
/// - Appointments: `/api/v1/appointments` (configured in routes)
/// - Health: `/api/v1/health`
/// - Swagger UI: `/swagger-ui/`
/// - OpenAPI spec: `/api-docs/openapi.json`
///
/// # Configuration
/// - `MONGODB_URI` and `DB_NAME` are required
/// - Server binds to `HOST`:`PORT`, defaulting to `127.0.0.1:8080`
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let store = MongoStore::connect(&config)
        .await
        .map_err(std::io::Error::other)?;
    let store: Arc<dyn AppointmentStore> = Arc::new(store);

    tracing::info!(
        host = %config.host,
        port = config.port,
        db = %config.db_name,
        "starting appointment service"
    );

    HttpServer::new(move || {
        let openapi = ApiDoc::openapi();

        App::new()
            .app_data(Data::from(store.clone()))
            .app_data(Data::new(openapi.clone()))
            .configure(vet_appointments::routes::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
