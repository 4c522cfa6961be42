use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};
#[cfg(test)]
use mockall::automock;
use mongodb::bson::DateTime as BsonDateTime;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{Appointment, AppointmentView};

mod mongo;

pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("stored document is malformed: {0}")]
    Malformed(String),
}

/// Half-open UTC day bucket used by the same-day conflict query. Any
/// time-of-day within the same calendar day maps to the same window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: BsonDateTime,
    pub end: BsonDateTime,
}

impl DayWindow {
    /// The `[00:00, next day 00:00)` window of the UTC day containing `instant`.
    pub fn containing(instant: DateTime<Utc>) -> Self {
        let start = instant.date_naive().and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);
        Self {
            start: BsonDateTime::from_millis(start.timestamp_millis()),
            end: BsonDateTime::from_millis(end.timestamp_millis()),
        }
    }
}

/// Fields of an appointment an update may overwrite. `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AppointmentChanges {
    pub date: Option<BsonDateTime>,
    pub pet: Option<ObjectId>,
    pub user: Option<ObjectId>,
    pub keeper: Option<ObjectId>,
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.pet.is_none() && self.user.is_none() && self.keeper.is_none()
    }
}

/// # Appointment Store
///
/// Persistence capability injected into the handlers. Pet and User documents
/// are opaque referenced entities; only their existence and display name are
/// consulted here.
///
/// None of the operations run inside a transaction, so the existence-check /
/// conflict-check / write sequence a handler performs has a race window: two
/// concurrent creates for the same pet, user and day can both pass the
/// conflict check before either writes. Known limitation.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Round-trip to the database, used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn pet_exists(&self, id: ObjectId) -> Result<bool, StoreError>;

    async fn user_exists(&self, id: ObjectId) -> Result<bool, StoreError>;

    async fn find_appointment(&self, id: ObjectId) -> Result<Option<Appointment>, StoreError>;

    /// Whether a non-cancelled appointment for `pet` + `user` already falls
    /// inside `window`. `exclude` skips one record so an update never
    /// conflicts with itself.
    async fn has_same_day_booking(
        &self,
        pet: ObjectId,
        user: ObjectId,
        window: DayWindow,
        exclude: Option<ObjectId>,
    ) -> Result<bool, StoreError>;

    async fn insert_appointment(&self, appointment: Appointment) -> Result<ObjectId, StoreError>;

    /// Partial overwrite. Returns the updated document, or `None` when the
    /// appointment vanished between validation and the write.
    async fn apply_update(
        &self,
        id: ObjectId,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>, StoreError>;

    /// Status transition to CANCELLED. Returns the updated document.
    async fn mark_cancelled(&self, id: ObjectId) -> Result<Option<Appointment>, StoreError>;

    /// Page of ACTIVE appointments plus the total ACTIVE count.
    async fn list_active(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<Appointment>, u64), StoreError>;

    /// Builds response views with referenced pet/user/keeper names resolved.
    async fn resolve_names(
        &self,
        appointments: Vec<Appointment>,
    ) -> Result<Vec<AppointmentView>, StoreError>;
}
