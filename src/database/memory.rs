//! In-memory `MarketplaceStore` implementations used by the HTTP tests.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use rand::seq::SliceRandom;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{MarketplaceStore, UpdateSummary};
use crate::models::{BookingScope, ServiceFilter};
use crate::utils::AppError;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<Document>>,
    services: RwLock<Vec<Document>>,
    bookings: RwLock<Vec<Document>>,
}

fn read(lock: &RwLock<Vec<Document>>) -> Result<RwLockReadGuard<'_, Vec<Document>>, AppError> {
    lock.read()
        .map_err(|_| AppError::DatabaseError("store lock poisoned".to_string()))
}

fn write(lock: &RwLock<Vec<Document>>) -> Result<RwLockWriteGuard<'_, Vec<Document>>, AppError> {
    lock.write()
        .map_err(|_| AppError::DatabaseError("store lock poisoned".to_string()))
}

fn has_id(document: &Document, id: ObjectId) -> bool {
    document.get_object_id("_id").ok() == Some(id)
}

fn field_is(document: &Document, field: &str, value: &str) -> bool {
    document.get_str(field).ok() == Some(value)
}

fn is_party(document: &Document, party: &str) -> bool {
    field_is(document, "userEmail", party) || field_is(document, "providerEmail", party)
}

/// `$set` semantics: counts as modified only when a value actually changes.
fn apply_set(document: &mut Document, changes: Document) -> bool {
    let mut modified = false;
    for (key, value) in changes {
        if document.get(&key) != Some(&value) {
            document.insert(key, value);
            modified = true;
        }
    }
    modified
}

fn matches_service(document: &Document, filter: &ServiceFilter) -> bool {
    let name_matches = filter.search.as_ref().map_or(true, |search| {
        document
            .get_str("name")
            .map(|name| name.to_lowercase().contains(&search.to_lowercase()))
            .unwrap_or(false)
    });
    let provider_matches = filter
        .provider_email
        .as_ref()
        .map_or(true, |email| field_is(document, "providerEmail", email));

    name_matches && provider_matches
}

fn insert_with_id(collection: &RwLock<Vec<Document>>, mut document: Document) -> Result<ObjectId, AppError> {
    let id = ObjectId::new();
    document.insert("_id", id);
    write(collection)?.push(document);
    Ok(id)
}

fn delete_where<F>(collection: &RwLock<Vec<Document>>, predicate: F) -> Result<u64, AppError>
where
    F: Fn(&Document) -> bool,
{
    let mut documents = write(collection)?;
    match documents.iter().position(predicate) {
        Some(index) => {
            documents.remove(index);
            Ok(1)
        }
        None => Ok(0),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> Vec<Document> {
        self.users.read().map(|u| u.clone()).unwrap_or_default()
    }

    pub fn services(&self) -> Vec<Document> {
        self.services.read().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MarketplaceStore for MemoryStore {
    async fn upsert_user(
        &self,
        email: &str,
        mut profile: Document,
        now: &str,
    ) -> Result<UpdateSummary, AppError> {
        let mut users = write(&self.users)?;

        if let Some(existing) = users.iter_mut().find(|u| field_is(u, "email", email)) {
            let modified = apply_set(existing, Document::from_iter([(
                "last_loggedIn".to_string(),
                Bson::from(now),
            )]));
            return Ok(UpdateSummary {
                matched: 1,
                modified: u64::from(modified),
                upserted_id: None,
            });
        }

        let id = ObjectId::new();
        profile.insert("_id", id);
        profile.insert("email", email);
        profile.insert("created_at", now);
        profile.insert("last_loggedIn", now);
        users.push(profile);

        Ok(UpdateSummary {
            matched: 0,
            modified: 0,
            upserted_id: Some(id),
        })
    }

    async fn find_services(&self, filter: &ServiceFilter) -> Result<Vec<Document>, AppError> {
        Ok(read(&self.services)?
            .iter()
            .filter(|s| matches_service(s, filter))
            .cloned()
            .collect())
    }

    async fn find_service(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        Ok(read(&self.services)?.iter().find(|s| has_id(s, id)).cloned())
    }

    async fn sample_services(&self, size: u32) -> Result<Vec<Document>, AppError> {
        let services = read(&self.services)?;
        let mut rng = rand::thread_rng();
        Ok(services
            .choose_multiple(&mut rng, size as usize)
            .cloned()
            .collect())
    }

    async fn insert_service(&self, service: Document) -> Result<ObjectId, AppError> {
        insert_with_id(&self.services, service)
    }

    async fn update_service(
        &self,
        id: ObjectId,
        provider_email: &str,
        changes: Document,
    ) -> Result<UpdateSummary, AppError> {
        let mut services = write(&self.services)?;
        let target = services
            .iter_mut()
            .find(|s| has_id(s, id) && field_is(s, "providerEmail", provider_email));

        Ok(match target {
            Some(service) => UpdateSummary {
                matched: 1,
                modified: u64::from(apply_set(service, changes)),
                upserted_id: None,
            },
            None => UpdateSummary::default(),
        })
    }

    async fn delete_service(&self, id: ObjectId, provider_email: &str) -> Result<u64, AppError> {
        delete_where(&self.services, |s| {
            has_id(s, id) && field_is(s, "providerEmail", provider_email)
        })
    }

    async fn insert_booking(&self, booking: Document) -> Result<ObjectId, AppError> {
        insert_with_id(&self.bookings, booking)
    }

    async fn find_bookings(&self, scope: &BookingScope) -> Result<Vec<Document>, AppError> {
        let mut bookings: Vec<Document> = read(&self.bookings)?
            .iter()
            .filter(|b| match scope {
                BookingScope::Provider(email) => field_is(b, "providerEmail", email),
                BookingScope::Customer(email) => field_is(b, "userEmail", email),
                BookingScope::All => true,
            })
            .cloned()
            .collect();

        bookings.sort_by(|a, b| {
            let a = a.get_str("created_at").unwrap_or_default();
            let b = b.get_str("created_at").unwrap_or_default();
            b.cmp(a)
        });

        Ok(bookings)
    }

    async fn find_booking(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        Ok(read(&self.bookings)?.iter().find(|b| has_id(b, id)).cloned())
    }

    async fn update_booking_status(
        &self,
        id: ObjectId,
        party: &str,
        status: &str,
    ) -> Result<UpdateSummary, AppError> {
        let mut bookings = write(&self.bookings)?;
        let target = bookings
            .iter_mut()
            .find(|b| has_id(b, id) && is_party(b, party));

        Ok(match target {
            Some(booking) => {
                let changes = Document::from_iter([(
                    "serviceStatus".to_string(),
                    Bson::from(status),
                )]);
                UpdateSummary {
                    matched: 1,
                    modified: u64::from(apply_set(booking, changes)),
                    upserted_id: None,
                }
            }
            None => UpdateSummary::default(),
        })
    }

    async fn delete_booking(&self, id: ObjectId, party: &str) -> Result<u64, AppError> {
        delete_where(&self.bookings, |b| has_id(b, id) && is_party(b, party))
    }
}

/// Store whose every call fails, for exercising the 500 paths.
pub struct FailingStore {
    detail: String,
}

impl FailingStore {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }

    fn fail<T>(&self) -> Result<T, AppError> {
        Err(AppError::DatabaseError(self.detail.clone()))
    }
}

#[async_trait]
impl MarketplaceStore for FailingStore {
    async fn upsert_user(&self, _: &str, _: Document, _: &str) -> Result<UpdateSummary, AppError> {
        self.fail()
    }

    async fn find_services(&self, _: &ServiceFilter) -> Result<Vec<Document>, AppError> {
        self.fail()
    }

    async fn find_service(&self, _: ObjectId) -> Result<Option<Document>, AppError> {
        self.fail()
    }

    async fn sample_services(&self, _: u32) -> Result<Vec<Document>, AppError> {
        self.fail()
    }

    async fn insert_service(&self, _: Document) -> Result<ObjectId, AppError> {
        self.fail()
    }

    async fn update_service(&self, _: ObjectId, _: &str, _: Document) -> Result<UpdateSummary, AppError> {
        self.fail()
    }

    async fn delete_service(&self, _: ObjectId, _: &str) -> Result<u64, AppError> {
        self.fail()
    }

    async fn insert_booking(&self, _: Document) -> Result<ObjectId, AppError> {
        self.fail()
    }

    async fn find_bookings(&self, _: &BookingScope) -> Result<Vec<Document>, AppError> {
        self.fail()
    }

    async fn find_booking(&self, _: ObjectId) -> Result<Option<Document>, AppError> {
        self.fail()
    }

    async fn update_booking_status(&self, _: ObjectId, _: &str, _: &str) -> Result<UpdateSummary, AppError> {
        self.fail()
    }

    async fn delete_booking(&self, _: ObjectId, _: &str) -> Result<u64, AppError> {
        self.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_upsert_inserts_once() {
        let store = MemoryStore::new();

        let first = store
            .upsert_user("a@x.com", doc! { "name": "Ana" }, "2024-01-01T00:00:00.000Z")
            .await
            .unwrap();
        assert!(first.upserted_id.is_some());

        let second = store
            .upsert_user("a@x.com", doc! { "name": "Other" }, "2024-01-02T00:00:00.000Z")
            .await
            .unwrap();
        assert_eq!(second.matched, 1);
        assert_eq!(second.modified, 1);
        assert!(second.upserted_id.is_none());

        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].get_str("name").unwrap(), "Ana");
        assert_eq!(users[0].get_str("created_at").unwrap(), "2024-01-01T00:00:00.000Z");
        assert_eq!(users[0].get_str("last_loggedIn").unwrap(), "2024-01-02T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_update_without_changes_is_not_modified() {
        let store = MemoryStore::new();
        let id = store
            .insert_service(doc! { "name": "Cleaning", "providerEmail": "p@x.com" })
            .await
            .unwrap();

        let summary = store
            .update_service(id, "p@x.com", doc! { "name": "Cleaning" })
            .await
            .unwrap();
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.modified, 0);
    }

    #[tokio::test]
    async fn test_sample_is_bounded() {
        let store = MemoryStore::new();
        for i in 0..10 {
            store
                .insert_service(doc! { "name": format!("Service {}", i) })
                .await
                .unwrap();
        }

        assert_eq!(store.sample_services(6).await.unwrap().len(), 6);
        assert_eq!(MemoryStore::new().sample_services(6).await.unwrap().len(), 0);
    }
}
