use actix_web::{HttpResponse, Responder, get, web};

use crate::models::HealthResponse;
use crate::store::AppointmentStore;

/// # Health Check Endpoint
///
/// Reports the service status together with store reachability.
///
/// ## Responses
///
/// - **200 OK**: service is up and the database answered a ping
/// - **503 Service Unavailable**: the database could not be reached
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "Health Check"
)]
#[get("/health")]
pub async fn health(store: web::Data<dyn AppointmentStore>) -> impl Responder {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse::up()),
        Err(error) => {
            tracing::warn!(%error, "health check could not reach the store");
            HttpResponse::ServiceUnavailable().json(HealthResponse::degraded())
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockAppointmentStore, StoreError};
    use actix_web::{App, test};
    use std::sync::Arc;

    async fn init_app(
        store: MockAppointmentStore,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        let store: Arc<dyn AppointmentStore> = Arc::new(store);
        test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .configure(configure_routes),
        )
        .await
    }

    #[actix_web::test]
    async fn test_health_up() {
        let mut store = MockAppointmentStore::new();
        store.expect_ping().returning(|| Ok(()));

        let app = init_app(store).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body: HealthResponse = test::read_body_json(resp).await;
        assert_eq!(body.status, "UP");
        assert_eq!(body.database, "reachable");
        assert!(!body.timestamp.is_empty());
    }

    #[actix_web::test]
    async fn test_health_degraded_when_store_unreachable() {
        let mut store = MockAppointmentStore::new();
        store
            .expect_ping()
            .returning(|| Err(StoreError::Malformed("no route to database".to_string())));

        let app = init_app(store).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 503);

        let body: HealthResponse = test::read_body_json(resp).await;
        assert_eq!(body.status, "DOWN");
        assert_eq!(body.database, "unreachable");
    }
}
