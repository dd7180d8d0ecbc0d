use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::results::UpdateResult;

use super::{MarketplaceStore, MongoDB, UpdateSummary, BOOKINGS, SERVICES, USERS};
use crate::models::{BookingScope, ServiceFilter};
use crate::utils::AppError;

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY
    )
}

impl From<UpdateResult> for UpdateSummary {
    fn from(result: UpdateResult) -> Self {
        UpdateSummary {
            matched: result.matched_count,
            modified: result.modified_count,
            upserted_id: result.upserted_id.and_then(|id| id.as_object_id()),
        }
    }
}

fn service_filter(filter: &ServiceFilter) -> Document {
    let mut query = Document::new();

    if let Some(search) = &filter.search {
        query.insert("name", doc! { "$regex": regex::escape(search), "$options": "i" });
    }
    if let Some(provider_email) = &filter.provider_email {
        query.insert("providerEmail", provider_email.as_str());
    }

    query
}

fn booking_filter(scope: &BookingScope) -> Document {
    match scope {
        BookingScope::Provider(email) => doc! { "providerEmail": email.as_str() },
        BookingScope::Customer(email) => doc! { "userEmail": email.as_str() },
        BookingScope::All => doc! {},
    }
}

fn party_filter(id: ObjectId, party: &str) -> Document {
    doc! {
        "_id": id,
        "$or": [ { "userEmail": party }, { "providerEmail": party } ]
    }
}

async fn insert_with_id(
    collection: mongodb::Collection<Document>,
    mut document: Document,
) -> Result<ObjectId, AppError> {
    let id = ObjectId::new();
    document.insert("_id", id);
    collection.insert_one(document).await?;
    Ok(id)
}

#[async_trait]
impl MarketplaceStore for MongoDB {
    async fn upsert_user(
        &self,
        email: &str,
        mut profile: Document,
        now: &str,
    ) -> Result<UpdateSummary, AppError> {
        let users = self.collection::<Document>(USERS);

        profile.remove("_id");
        profile.remove("email");
        profile.remove("last_loggedIn");
        profile.insert("created_at", now);

        let filter = doc! { "email": email };
        let update = doc! {
            "$set": { "last_loggedIn": now },
            "$setOnInsert": profile,
        };

        let result = match users
            .update_one(filter.clone(), update.clone())
            .upsert(true)
            .await
        {
            Ok(result) => result,
            // A concurrent first login inserted the same email; the document
            // now exists, so a plain update refreshes it.
            Err(e) if is_duplicate_key(&e) => {
                log::debug!("🔁 Upsert race on {}, retrying as update", email);
                users.update_one(filter, update).await?
            }
            Err(e) => return Err(e.into()),
        };

        Ok(result.into())
    }

    async fn find_services(&self, filter: &ServiceFilter) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .collection::<Document>(SERVICES)
            .find(service_filter(filter))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_service(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self
            .collection::<Document>(SERVICES)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn sample_services(&self, size: u32) -> Result<Vec<Document>, AppError> {
        let pipeline = vec![doc! { "$sample": { "size": i64::from(size) } }];
        let cursor = self
            .collection::<Document>(SERVICES)
            .aggregate(pipeline)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_service(&self, service: Document) -> Result<ObjectId, AppError> {
        insert_with_id(self.collection(SERVICES), service).await
    }

    async fn update_service(
        &self,
        id: ObjectId,
        provider_email: &str,
        changes: Document,
    ) -> Result<UpdateSummary, AppError> {
        let result = self
            .collection::<Document>(SERVICES)
            .update_one(
                doc! { "_id": id, "providerEmail": provider_email },
                doc! { "$set": changes },
            )
            .await?;
        Ok(result.into())
    }

    async fn delete_service(&self, id: ObjectId, provider_email: &str) -> Result<u64, AppError> {
        let result = self
            .collection::<Document>(SERVICES)
            .delete_one(doc! { "_id": id, "providerEmail": provider_email })
            .await?;
        Ok(result.deleted_count)
    }

    async fn insert_booking(&self, booking: Document) -> Result<ObjectId, AppError> {
        insert_with_id(self.collection(BOOKINGS), booking).await
    }

    async fn find_bookings(&self, scope: &BookingScope) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .collection::<Document>(BOOKINGS)
            .find(booking_filter(scope))
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_booking(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self
            .collection::<Document>(BOOKINGS)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn update_booking_status(
        &self,
        id: ObjectId,
        party: &str,
        status: &str,
    ) -> Result<UpdateSummary, AppError> {
        let result = self
            .collection::<Document>(BOOKINGS)
            .update_one(
                party_filter(id, party),
                doc! { "$set": { "serviceStatus": status } },
            )
            .await?;
        Ok(result.into())
    }

    async fn delete_booking(&self, id: ObjectId, party: &str) -> Result<u64, AppError> {
        let result = self
            .collection::<Document>(BOOKINGS)
            .delete_one(party_filter(id, party))
            .await?;
        Ok(result.deleted_count)
    }
}
