use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

use crate::models::{BookingScope, ServiceFilter};
use crate::utils::AppError;

/// Outcome of an update or upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
    pub upserted_id: Option<ObjectId>,
}

/// Storage operations behind every route. One call per request.
///
/// Mutations that take an owner only touch documents whose owning field
/// still matches it, so ownership checked beforehand cannot be raced away.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// Refreshes `last_loggedIn` for an existing email, otherwise inserts
    /// `profile` with `created_at` and `last_loggedIn` set to `now`.
    /// Top-level profile names must not start with `$` or contain `.`.
    async fn upsert_user(
        &self,
        email: &str,
        profile: Document,
        now: &str,
    ) -> Result<UpdateSummary, AppError>;

    async fn find_services(&self, filter: &ServiceFilter) -> Result<Vec<Document>, AppError>;

    async fn find_service(&self, id: ObjectId) -> Result<Option<Document>, AppError>;

    async fn sample_services(&self, size: u32) -> Result<Vec<Document>, AppError>;

    async fn insert_service(&self, service: Document) -> Result<ObjectId, AppError>;

    async fn update_service(
        &self,
        id: ObjectId,
        provider_email: &str,
        changes: Document,
    ) -> Result<UpdateSummary, AppError>;

    async fn delete_service(&self, id: ObjectId, provider_email: &str) -> Result<u64, AppError>;

    async fn insert_booking(&self, booking: Document) -> Result<ObjectId, AppError>;

    /// Newest first by `created_at`.
    async fn find_bookings(&self, scope: &BookingScope) -> Result<Vec<Document>, AppError>;

    async fn find_booking(&self, id: ObjectId) -> Result<Option<Document>, AppError>;

    /// `party` must be the booking's `userEmail` or `providerEmail`.
    async fn update_booking_status(
        &self,
        id: ObjectId,
        party: &str,
        status: &str,
    ) -> Result<UpdateSummary, AppError>;

    async fn delete_booking(&self, id: ObjectId, party: &str) -> Result<u64, AppError>;
}
