use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Health Status Response
///
/// Represents the operational status of the service and its backing store.
///
/// ## Fields
/// - `status`: "UP" when the service can reach the database, "DOWN" otherwise
/// - `database`: "reachable" or "unreachable"
/// - `timestamp`: ISO 8601 formatted timestamp of the status check
///
/// ## Example JSON
/// ```json
/// {
///   "status": "UP",
///   "database": "reachable",
///   "timestamp": "2024-03-10T15:30:45.123456789Z"
/// }
/// ```
#[derive(Serialize, Debug, PartialEq, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
            database: "reachable".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn degraded() -> Self {
        Self {
            status: "DOWN".to_string(),
            database: "unreachable".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_health_response_up() {
        let response = HealthResponse::up();

        assert_eq!(response.status, "UP");
        assert_eq!(response.database, "reachable");

        let parsed_time = DateTime::parse_from_rfc3339(&response.timestamp);
        assert!(
            parsed_time.is_ok(),
            "Timestamp should be valid RFC3339 format"
        );
    }

    #[test]
    fn test_health_response_degraded() {
        let response = HealthResponse::degraded();

        assert_eq!(response.status, "DOWN");
        assert_eq!(response.database, "unreachable");
    }
}
