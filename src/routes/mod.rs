use actix_web::web;

/// # Appointment Lifecycle Endpoints
///
/// Create, list, read, update and cancel appointment records, with the
/// same-day double-booking rule enforced on every write.
///
/// ## Mounted Routes
///
/// ```text
/// POST   /api/v1/appointments/createAppointment
/// GET    /api/v1/appointments
/// GET    /api/v1/appointments/{id}
/// PUT    /api/v1/appointments/updateAppointment/{id}
/// DELETE /api/v1/appointments/cancelAppointment/{id}
/// ```
pub mod appointment;

/// # Health Check Endpoint
///
/// Liveness probe reporting store reachability.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "UP",
///   "database": "reachable",
///   "timestamp": "2023-10-05T12:34:56.789Z"
/// }
/// ```
pub mod health;

/// # API Route Configuration
///
/// Sets up versioned API endpoints under the `/api/v1` base path.
///
/// ## Mounted Services
/// - Health check endpoint (see [`health::configure_routes`] for details)
/// - Appointment lifecycle endpoints (see [`appointment::configure_routes`])
///
/// [`health::configure_routes`]: crate::routes::health::configure_routes
/// [`appointment::configure_routes`]: crate::routes::appointment::configure_routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure_routes)
            .configure(appointment::configure_routes),
    );
}
