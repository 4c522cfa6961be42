use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};

use super::{AppointmentChanges, AppointmentStore, DayWindow, StoreError};
use crate::config::AppConfig;
use crate::models::{Appointment, AppointmentStatus, AppointmentView, NamedRef};

/// MongoDB-backed implementation of [`AppointmentStore`].
///
/// Appointments live in the `appointments` collection; `pets` and `users`
/// hold the referenced entities and are only read for existence checks and
/// name resolution.
pub struct MongoStore {
    database: Database,
    appointments: Collection<Appointment>,
    pets: Collection<Document>,
    users: Collection<Document>,
}

impl MongoStore {
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let database = client.database(&config.db_name);
        Ok(Self {
            appointments: database.collection("appointments"),
            pets: database.collection("pets"),
            users: database.collection("users"),
            database,
        })
    }

    async fn display_name(
        &self,
        collection: &Collection<Document>,
        id: ObjectId,
    ) -> Result<Option<String>, StoreError> {
        let document = collection.find_one(doc! { "_id": id }).await?;
        Ok(document.and_then(|d| d.get_str("name").ok().map(str::to_string)))
    }

    async fn view(&self, appointment: Appointment) -> Result<AppointmentView, StoreError> {
        let id = appointment
            .id
            .ok_or_else(|| StoreError::Malformed("appointment without _id".to_string()))?;
        let date = appointment
            .date
            .try_to_rfc3339_string()
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let pet = NamedRef {
            id: appointment.pet.to_hex(),
            name: self.display_name(&self.pets, appointment.pet).await?,
        };
        let user = NamedRef {
            id: appointment.user.to_hex(),
            name: self.display_name(&self.users, appointment.user).await?,
        };
        // Keepers are staff, stored alongside regular users.
        let keeper = match appointment.keeper {
            Some(keeper_id) => Some(NamedRef {
                id: keeper_id.to_hex(),
                name: self.display_name(&self.users, keeper_id).await?,
            }),
            None => None,
        };

        Ok(AppointmentView {
            id: id.to_hex(),
            date,
            status: appointment.status,
            pet,
            user,
            keeper,
        })
    }
}

fn set_document(changes: AppointmentChanges) -> Document {
    let mut set = Document::new();
    if let Some(date) = changes.date {
        set.insert("date", date);
    }
    if let Some(pet) = changes.pet {
        set.insert("pet", pet);
    }
    if let Some(user) = changes.user {
        set.insert("user", user);
    }
    if let Some(keeper) = changes.keeper {
        set.insert("keeper", keeper);
    }
    set
}

#[async_trait]
impl AppointmentStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn pet_exists(&self, id: ObjectId) -> Result<bool, StoreError> {
        Ok(self.pets.find_one(doc! { "_id": id }).await?.is_some())
    }

    async fn user_exists(&self, id: ObjectId) -> Result<bool, StoreError> {
        Ok(self.users.find_one(doc! { "_id": id }).await?.is_some())
    }

    async fn find_appointment(&self, id: ObjectId) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.find_one(doc! { "_id": id }).await?)
    }

    async fn has_same_day_booking(
        &self,
        pet: ObjectId,
        user: ObjectId,
        window: DayWindow,
        exclude: Option<ObjectId>,
    ) -> Result<bool, StoreError> {
        let mut filter = doc! {
            "pet": pet,
            "user": user,
            "status": AppointmentStatus::Active.as_str(),
            "date": { "$gte": window.start, "$lt": window.end },
        };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }
        Ok(self.appointments.find_one(filter).await?.is_some())
    }

    async fn insert_appointment(&self, appointment: Appointment) -> Result<ObjectId, StoreError> {
        let result = self.appointments.insert_one(&appointment).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Malformed("inserted _id is not an ObjectId".to_string()))
    }

    async fn apply_update(
        &self,
        id: ObjectId,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>, StoreError> {
        let set = set_document(changes);
        if set.is_empty() {
            // No-op update, just re-read the current document.
            return self.find_appointment(id).await;
        }
        Ok(self
            .appointments
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn mark_cancelled(&self, id: ObjectId) -> Result<Option<Appointment>, StoreError> {
        Ok(self
            .appointments
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "status": AppointmentStatus::Cancelled.as_str() } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn list_active(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<Appointment>, u64), StoreError> {
        let filter = doc! { "status": AppointmentStatus::Active.as_str() };
        let page: Vec<Appointment> = self
            .appointments
            .find(filter.clone())
            .skip(offset)
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        let total = self.appointments.count_documents(filter).await?;
        Ok((page, total))
    }

    async fn resolve_names(
        &self,
        appointments: Vec<Appointment>,
    ) -> Result<Vec<AppointmentView>, StoreError> {
        let mut views = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            views.push(self.view(appointment).await?);
        }
        Ok(views)
    }
}
