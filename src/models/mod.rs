/// # Appointment Domain Model
///
/// Persisted appointment documents, the two-state status lifecycle, and the
/// response-facing view types with referenced entities resolved by name.
pub mod appointment;

/// # Health Status Response
///
/// Operational status of the service and its backing store with a timestamp.
pub mod health;

pub use appointment::{Appointment, AppointmentStatus, AppointmentView, NamedRef};
pub use health::HealthResponse;
