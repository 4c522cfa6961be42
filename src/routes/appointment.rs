use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};
use crate::models::{Appointment, AppointmentStatus, AppointmentView};
use crate::store::{AppointmentChanges, AppointmentStore, DayWindow, StoreError};
use crate::validators;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    /// RFC 3339 instant, naive datetime, or plain `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub pet: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub keeper: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAppointmentRequest {
    pub date: Option<String>,
    pub pet: Option<String>,
    pub user: Option<String>,
    pub keeper: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentResponse {
    pub success: bool,
    pub msg: String,
    pub appointment: AppointmentView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentListResponse {
    pub success: bool,
    pub total: u64,
    pub appointments: Vec<AppointmentView>,
}

/// Accepts an RFC 3339 instant, a naive datetime, or a plain calendar date
/// (interpreted as midnight UTC).
fn parse_appointment_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(parsed.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ApiError::InvalidInput(format!(
        "\"{raw}\" is not a valid appointment date"
    )))
}

async fn single_view(
    store: &dyn AppointmentStore,
    appointment: Appointment,
) -> Result<AppointmentView, ApiError> {
    let mut views = store.resolve_names(vec![appointment]).await?;
    views
        .pop()
        .ok_or_else(|| StoreError::Malformed("name resolution returned no view".to_string()))
        .map_err(ApiError::from)
}

/// # Create Appointment
///
/// Books an appointment for a pet and a user. Both referenced entities must
/// exist, and the pair may hold at most one non-cancelled appointment per
/// UTC calendar day; a second booking on the same day is rejected whatever
/// its time-of-day.
///
/// ## Responses
/// - **200 OK**: created, response carries the persisted record
/// - **400 Bad Request**: field errors, unparseable date, or same-day conflict
/// - **404 Not Found**: referenced pet or user does not exist
/// - **500 Internal Server Error**: store failure
#[utoipa::path(
    post,
    path = "/api/v1/appointments/createAppointment",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment created", body = AppointmentResponse),
        (status = 400, description = "Invalid input or same-day double booking"),
        (status = 404, description = "Referenced pet or user not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "Appointments"
)]
#[post("/createAppointment")]
pub async fn create_appointment(
    req: web::Json<CreateAppointmentRequest>,
    store: web::Data<dyn AppointmentStore>,
) -> ApiResult<HttpResponse> {
    let fields = validators::create_appointment(&req).map_err(ApiError::Validation)?;
    let date = parse_appointment_date(&req.date)?;

    if !store.pet_exists(fields.pet).await? {
        return Err(ApiError::NotFound(
            "no pet found for the supplied id".to_string(),
        ));
    }
    if !store.user_exists(fields.user).await? {
        return Err(ApiError::NotFound(
            "no user found for the supplied id".to_string(),
        ));
    }

    let window = DayWindow::containing(date);
    if store
        .has_same_day_booking(fields.pet, fields.user, window, None)
        .await?
    {
        return Err(ApiError::Conflict(
            "the user and pet already have an appointment on this day".to_string(),
        ));
    }

    let mut appointment = Appointment {
        id: None,
        date: BsonDateTime::from_millis(date.timestamp_millis()),
        pet: fields.pet,
        user: fields.user,
        keeper: fields.keeper,
        status: AppointmentStatus::Active,
    };
    let id = store.insert_appointment(appointment.clone()).await?;
    appointment.id = Some(id);

    let view = single_view(store.get_ref(), appointment).await?;
    Ok(HttpResponse::Ok().json(AppointmentResponse {
        success: true,
        msg: format!("appointment created for {}", view.date),
        appointment: view,
    }))
}

/// # List Appointments
///
/// Paginated listing of ACTIVE appointments with referenced names resolved.
///
/// ## Query Parameters
/// - `limit` (default 10)
/// - `offset` (default 0)
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, defaults to 10"),
        ("offset" = Option<u64>, Query, description = "Records to skip, defaults to 0")
    ),
    responses(
        (status = 200, description = "Page of active appointments", body = AppointmentListResponse),
        (status = 500, description = "Store failure")
    ),
    tag = "Appointments"
)]
#[get("")]
pub async fn list_appointments(
    query: web::Query<ListQuery>,
    store: web::Data<dyn AppointmentStore>,
) -> ApiResult<HttpResponse> {
    let (page, total) = store.list_active(query.limit, query.offset).await?;
    let appointments = store.resolve_names(page).await?;

    Ok(HttpResponse::Ok().json(AppointmentListResponse {
        success: true,
        total,
        appointments,
    }))
}

/// # Read Appointment
///
/// Single lookup by path id.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment document id")),
    responses(
        (status = 200, description = "Appointment found", body = AppointmentResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No appointment with this id")
    ),
    tag = "Appointments"
)]
#[get("/{id}")]
pub async fn get_appointment(
    path: web::Path<String>,
    store: web::Data<dyn AppointmentStore>,
) -> ApiResult<HttpResponse> {
    let id = validators::path_id(&path).map_err(ApiError::Validation)?;

    let appointment = store.find_appointment(id).await?.ok_or_else(|| {
        ApiError::NotFound("no appointment found for the supplied id".to_string())
    })?;

    let view = single_view(store.get_ref(), appointment).await?;
    Ok(HttpResponse::Ok().json(AppointmentResponse {
        success: true,
        msg: "appointment found".to_string(),
        appointment: view,
    }))
}

/// # Update Appointment
///
/// Partial overwrite of date, pet, user or keeper. Supplied references are
/// re-checked for existence and the same-day conflict check is re-run over
/// the effective date/pet/user, excluding the record itself so an update
/// that keeps its own day never self-conflicts. An empty body is a no-op
/// returning the current record.
#[utoipa::path(
    put,
    path = "/api/v1/appointments/updateAppointment/{id}",
    params(("id" = String, Path, description = "Appointment document id")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentResponse),
        (status = 400, description = "Invalid input or same-day double booking"),
        (status = 404, description = "Appointment, pet or user not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "Appointments"
)]
#[put("/updateAppointment/{id}")]
pub async fn update_appointment(
    path: web::Path<String>,
    req: web::Json<UpdateAppointmentRequest>,
    store: web::Data<dyn AppointmentStore>,
) -> ApiResult<HttpResponse> {
    let id = validators::path_id(&path).map_err(ApiError::Validation)?;
    let fields = validators::update_appointment(&req).map_err(ApiError::Validation)?;

    let existing = store.find_appointment(id).await?.ok_or_else(|| {
        ApiError::NotFound("no appointment found for the supplied id".to_string())
    })?;

    let new_date = match req.date.as_deref() {
        Some(raw) => Some(parse_appointment_date(raw)?),
        None => None,
    };

    if let Some(pet) = fields.pet {
        if !store.pet_exists(pet).await? {
            return Err(ApiError::NotFound(
                "no pet found for the supplied id".to_string(),
            ));
        }
    }
    if let Some(user) = fields.user {
        if !store.user_exists(user).await? {
            return Err(ApiError::NotFound(
                "no user found for the supplied id".to_string(),
            ));
        }
    }

    // Conflict check over the values the record will hold after the update.
    let effective_date = match new_date {
        Some(date) => date,
        None => DateTime::<Utc>::from_timestamp_millis(existing.date.timestamp_millis())
            .ok_or_else(|| StoreError::Malformed("stored date out of range".to_string()))?,
    };
    let pet = fields.pet.unwrap_or(existing.pet);
    let user = fields.user.unwrap_or(existing.user);

    let window = DayWindow::containing(effective_date);
    if store
        .has_same_day_booking(pet, user, window, Some(id))
        .await?
    {
        return Err(ApiError::Conflict(
            "the user and pet already have an appointment on this day".to_string(),
        ));
    }

    let changes = AppointmentChanges {
        date: new_date.map(|d| BsonDateTime::from_millis(d.timestamp_millis())),
        pet: fields.pet,
        user: fields.user,
        keeper: fields.keeper,
    };
    let updated = store.apply_update(id, changes).await?.ok_or_else(|| {
        ApiError::NotFound("no appointment found for the supplied id".to_string())
    })?;

    let view = single_view(store.get_ref(), updated).await?;
    Ok(HttpResponse::Ok().json(AppointmentResponse {
        success: true,
        msg: format!("appointment updated for {}", view.date),
        appointment: view,
    }))
}

/// # Cancel Appointment
///
/// One-way status transition. Cancelling an already-cancelled appointment is
/// rejected with 400 rather than treated as idempotent.
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/cancelAppointment/{id}",
    params(("id" = String, Path, description = "Appointment document id")),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentResponse),
        (status = 400, description = "Malformed id or already cancelled"),
        (status = 404, description = "No appointment with this id")
    ),
    tag = "Appointments"
)]
#[delete("/cancelAppointment/{id}")]
pub async fn cancel_appointment(
    path: web::Path<String>,
    store: web::Data<dyn AppointmentStore>,
) -> ApiResult<HttpResponse> {
    let id = validators::path_id(&path).map_err(ApiError::Validation)?;

    let existing = store.find_appointment(id).await?.ok_or_else(|| {
        ApiError::NotFound("no appointment found for the supplied id".to_string())
    })?;
    if existing.status == AppointmentStatus::Cancelled {
        return Err(ApiError::Conflict(
            "the appointment is already cancelled".to_string(),
        ));
    }

    let cancelled = store.mark_cancelled(id).await?.ok_or_else(|| {
        ApiError::NotFound("no appointment found for the supplied id".to_string())
    })?;

    let view = single_view(store.get_ref(), cancelled).await?;
    Ok(HttpResponse::Ok().json(AppointmentResponse {
        success: true,
        msg: "appointment cancelled".to_string(),
        appointment: view,
    }))
}

/// Configures appointment routes under /api/v1
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/appointments")
            .service(create_appointment)
            .service(list_appointments)
            .service(get_appointment)
            .service(update_appointment)
            .service(cancel_appointment),
    );
}
