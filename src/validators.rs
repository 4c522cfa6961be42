//! Declarative per-operation field checks, run before a handler touches the
//! store. Structural problems are aggregated into one list of
//! [`FieldError`]s so the caller sees every bad field at once; existence
//! checks against the store happen afterwards in the handler path.

use mongodb::bson::oid::ObjectId;

use crate::error::FieldError;
use crate::routes::appointment::{CreateAppointmentRequest, UpdateAppointmentRequest};

/// Structurally valid create fields. The raw date string is checked for
/// presence here and parsed by the handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreateFields {
    pub pet: ObjectId,
    pub user: ObjectId,
    pub keeper: Option<ObjectId>,
}

/// Structurally valid update fields; every one is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UpdateFields {
    pub pet: Option<ObjectId>,
    pub user: Option<ObjectId>,
    pub keeper: Option<ObjectId>,
}

fn required(field: &str, raw: &str, errors: &mut Vec<FieldError>) -> bool {
    if raw.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
        false
    } else {
        true
    }
}

fn object_id(field: &str, raw: &str, errors: &mut Vec<FieldError>) -> Option<ObjectId> {
    match ObjectId::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(FieldError::new(field, "is not a valid document id"));
            None
        }
    }
}

pub fn create_appointment(
    req: &CreateAppointmentRequest,
) -> Result<CreateFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    required("date", &req.date, &mut errors);
    let pet = if required("pet", &req.pet, &mut errors) {
        object_id("pet", &req.pet, &mut errors)
    } else {
        None
    };
    let user = if required("user", &req.user, &mut errors) {
        object_id("user", &req.user, &mut errors)
    } else {
        None
    };
    let keeper = match req.keeper.as_deref() {
        Some(raw) if !raw.trim().is_empty() => object_id("keeper", raw, &mut errors),
        _ => None,
    };

    match (pet, user, errors.is_empty()) {
        (Some(pet), Some(user), true) => Ok(CreateFields { pet, user, keeper }),
        _ => Err(errors),
    }
}

pub fn update_appointment(
    req: &UpdateAppointmentRequest,
) -> Result<UpdateFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(date) = req.date.as_deref() {
        if date.trim().is_empty() {
            errors.push(FieldError::new("date", "must not be empty when supplied"));
        }
    }
    let pet = req
        .pet
        .as_deref()
        .and_then(|raw| object_id("pet", raw, &mut errors));
    let user = req
        .user
        .as_deref()
        .and_then(|raw| object_id("user", raw, &mut errors));
    let keeper = req
        .keeper
        .as_deref()
        .and_then(|raw| object_id("keeper", raw, &mut errors));

    if errors.is_empty() {
        Ok(UpdateFields { pet, user, keeper })
    } else {
        Err(errors)
    }
}

/// Checks the shape of an id path parameter. Existence is the handler's job.
pub fn path_id(raw: &str) -> Result<ObjectId, Vec<FieldError>> {
    let mut errors = Vec::new();
    object_id("id", raw, &mut errors).ok_or(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PET: &str = "65a1b2c3d4e5f6a7b8c9d0e1";
    const USER: &str = "65a1b2c3d4e5f6a7b8c9d0e2";

    #[test]
    fn test_create_accepts_valid_fields() {
        let req = CreateAppointmentRequest {
            date: "2024-05-01".to_string(),
            pet: PET.to_string(),
            user: USER.to_string(),
            keeper: None,
        };

        let fields = create_appointment(&req).unwrap();
        assert_eq!(fields.pet.to_hex(), PET);
        assert_eq!(fields.user.to_hex(), USER);
        assert!(fields.keeper.is_none());
    }

    #[test]
    fn test_create_aggregates_every_missing_field() {
        let req = CreateAppointmentRequest {
            date: String::new(),
            pet: String::new(),
            user: "  ".to_string(),
            keeper: None,
        };

        let errors = create_appointment(&req).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["date", "pet", "user"]);
        assert!(errors.iter().all(|e| e.message == "is required"));
    }

    #[test]
    fn test_create_rejects_malformed_ids() {
        let req = CreateAppointmentRequest {
            date: "2024-05-01".to_string(),
            pet: "not-an-object-id".to_string(),
            user: USER.to_string(),
            keeper: Some("also-bad".to_string()),
        };

        let errors = create_appointment(&req).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["pet", "keeper"]);
        assert!(errors.iter().all(|e| e.message == "is not a valid document id"));
    }

    #[test]
    fn test_update_all_fields_optional() {
        let fields = update_appointment(&UpdateAppointmentRequest::default()).unwrap();
        assert_eq!(fields, UpdateFields::default());
    }

    #[test]
    fn test_update_rejects_empty_date_and_bad_id() {
        let req = UpdateAppointmentRequest {
            date: Some("   ".to_string()),
            pet: Some("nope".to_string()),
            user: None,
            keeper: None,
        };

        let errors = update_appointment(&req).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "date");
        assert_eq!(errors[1].field, "pet");
    }

    #[test]
    fn test_path_id() {
        assert_eq!(path_id(PET).unwrap().to_hex(), PET);

        let errors = path_id("12345").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "id");
    }
}
