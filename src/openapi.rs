use utoipa::OpenApi;

/// OpenAPI Specification Documentation
///
/// Defines the API contract using OpenAPI 3.0 format with utoipa procedural
/// macros. Generated at compile time; any change to the API surface should be
/// reflected here to keep the documentation accurate.
///
/// # Endpoints
/// - Health Check: `GET /api/v1/health`
/// - Appointments: create, list, read, update, cancel under
///   `/api/v1/appointments`
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::appointment::create_appointment,
        crate::routes::appointment::list_appointments,
        crate::routes::appointment::get_appointment,
        crate::routes::appointment::update_appointment,
        crate::routes::appointment::cancel_appointment,
    ),
    components(
        schemas(
            crate::models::health::HealthResponse,
            crate::models::appointment::AppointmentStatus,
            crate::models::appointment::AppointmentView,
            crate::models::appointment::NamedRef,
            crate::routes::appointment::CreateAppointmentRequest,
            crate::routes::appointment::UpdateAppointmentRequest,
            crate::routes::appointment::AppointmentResponse,
            crate::routes::appointment::AppointmentListResponse,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "Health Check", description = "Service health monitoring endpoints"),
        (name = "Appointments", description = "Veterinary appointment lifecycle endpoints")
    ),
    info(
        description = "REST API for veterinary appointment booking with same-day double-booking prevention",
        title = "Veterinary Appointments API",
        version = "0.3.0",
    )
)]
pub struct ApiDoc;
