use mongodb::bson::DateTime as BsonDateTime;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Appointment Status
///
/// Two-state lifecycle of a booking. The transition is one-way: an ACTIVE
/// appointment can be cancelled, a CANCELLED one is terminal. Records are
/// never physically deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Active,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Active => "ACTIVE",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Active
    }
}

/// # Appointment Document
///
/// The persisted shape of an appointment in the `appointments` collection.
///
/// ## Fields
/// - `id`: MongoDB `_id`, absent until the document is inserted
/// - `date`: the booked calendar instant (conflict checks bucket it per UTC day)
/// - `pet` / `user`: references into the `pets` / `users` collections
/// - `keeper`: optional staff reference
/// - `status`: defaults to ACTIVE for documents written before the field existed
///
/// ## Invariant
/// For a given (pet, user) pair at most one non-cancelled appointment may
/// exist per UTC calendar day. Enforced by the conflict query at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub date: BsonDateTime,
    pub pet: ObjectId,
    pub user: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keeper: Option<ObjectId>,
    #[serde(default)]
    pub status: AppointmentStatus,
}

/// A referenced entity with its display name resolved, the JSON analogue of a
/// populated foreign reference. `name` is absent when the referenced document
/// is gone or carries no `name` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NamedRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// # Appointment View
///
/// The response-facing shape of an appointment: hex string ids, RFC 3339
/// date, and pet/user/keeper resolved to [`NamedRef`] pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AppointmentView {
    pub id: String,
    pub date: String,
    pub status: AppointmentStatus,
    pub pet: NamedRef,
    pub user: NamedRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keeper: Option<NamedRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document, to_document};

    fn oid(hex: &str) -> ObjectId {
        ObjectId::parse_str(hex).unwrap()
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Active).unwrap(),
            "\"ACTIVE\""
        );
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
        assert_eq!(AppointmentStatus::Active.as_str(), "ACTIVE");
        assert_eq!(AppointmentStatus::Cancelled.as_str(), "CANCELLED");
    }

    #[test]
    fn test_unsaved_appointment_omits_id() {
        let appointment = Appointment {
            id: None,
            date: BsonDateTime::from_millis(1_714_521_600_000),
            pet: oid("65a1b2c3d4e5f6a7b8c9d0e1"),
            user: oid("65a1b2c3d4e5f6a7b8c9d0e2"),
            keeper: None,
            status: AppointmentStatus::Active,
        };

        let document = to_document(&appointment).unwrap();
        assert!(!document.contains_key("_id"));
        assert!(!document.contains_key("keeper"));
        assert_eq!(document.get_str("status").unwrap(), "ACTIVE");
    }

    #[test]
    fn test_document_roundtrip() {
        let appointment = Appointment {
            id: Some(oid("65a1b2c3d4e5f6a7b8c9d0e3")),
            date: BsonDateTime::from_millis(1_714_586_400_000),
            pet: oid("65a1b2c3d4e5f6a7b8c9d0e1"),
            user: oid("65a1b2c3d4e5f6a7b8c9d0e2"),
            keeper: Some(oid("65a1b2c3d4e5f6a7b8c9d0e4")),
            status: AppointmentStatus::Cancelled,
        };

        let document = to_document(&appointment).unwrap();
        let decoded: Appointment = from_document(document).unwrap();
        assert_eq!(decoded, appointment);
    }

    #[test]
    fn test_missing_status_defaults_to_active() {
        // Documents written before the status field existed must decode as ACTIVE.
        let document = doc! {
            "_id": oid("65a1b2c3d4e5f6a7b8c9d0e3"),
            "date": BsonDateTime::from_millis(1_714_521_600_000),
            "pet": oid("65a1b2c3d4e5f6a7b8c9d0e1"),
            "user": oid("65a1b2c3d4e5f6a7b8c9d0e2"),
        };

        let decoded: Appointment = from_document(document).unwrap();
        assert_eq!(decoded.status, AppointmentStatus::Active);
        assert!(decoded.keeper.is_none());
    }

    #[test]
    fn test_view_omits_absent_keeper() {
        let view = AppointmentView {
            id: "65a1b2c3d4e5f6a7b8c9d0e3".to_string(),
            date: "2024-05-01T00:00:00Z".to_string(),
            status: AppointmentStatus::Active,
            pet: NamedRef {
                id: "65a1b2c3d4e5f6a7b8c9d0e1".to_string(),
                name: Some("Firulais".to_string()),
            },
            user: NamedRef {
                id: "65a1b2c3d4e5f6a7b8c9d0e2".to_string(),
                name: None,
            },
            keeper: None,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("keeper").is_none());
        assert_eq!(json["pet"]["name"], "Firulais");
        assert!(json["user"].get("name").is_none());
    }
}
