// ==================== SERVICE CATALOG ====================
// Services published by providers. Every mutation is restricted to the
// provider whose email is on the document.

use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};

use crate::database::{MarketplaceStore, UpdateSummary};
use crate::models::{from_json, parse_object_id, Claims, ServiceFilter, RANDOM_SAMPLE_SIZE};
use crate::utils::AppError;

pub const NOT_FOUND_OR_UNCHANGED: &str = "Service not found or no changes made";

pub async fn list_services(
    store: &dyn MarketplaceStore,
    filter: &ServiceFilter,
) -> Result<Vec<Document>, AppError> {
    store.find_services(filter).await
}

pub async fn get_service(
    store: &dyn MarketplaceStore,
    raw_id: &str,
) -> Result<Option<Document>, AppError> {
    let id = parse_object_id(raw_id)?;
    store.find_service(id).await
}

pub async fn random_services(store: &dyn MarketplaceStore) -> Result<Vec<Document>, AppError> {
    store.sample_services(RANDOM_SAMPLE_SIZE).await
}

pub async fn create_service(
    store: &dyn MarketplaceStore,
    session: &Claims,
    body: Map<String, Value>,
) -> Result<ObjectId, AppError> {
    let mut service = from_json(body)?;
    service.remove("_id");

    match service.get("providerEmail") {
        None | Some(Bson::Null) => {
            service.insert("providerEmail", session.email.as_str());
        }
        Some(Bson::String(owner)) if *owner == session.email => {}
        Some(_) => {
            return Err(AppError::Forbidden(
                "Forbidden: services can only be published under your own email".to_string(),
            ))
        }
    }

    store.insert_service(service).await
}

pub async fn update_service(
    store: &dyn MarketplaceStore,
    session: &Claims,
    raw_id: &str,
    body: Map<String, Value>,
) -> Result<UpdateSummary, AppError> {
    let id = parse_object_id(raw_id)?;

    let mut changes = from_json(body)?;
    changes.remove("_id");

    if let Some(owner) = changes.get("providerEmail") {
        if owner.as_str() != Some(session.email.as_str()) {
            return Err(AppError::Forbidden(
                "Forbidden: a service cannot be transferred to another provider".to_string(),
            ));
        }
    }

    if changes.is_empty() {
        return Err(AppError::NotFound(NOT_FOUND_OR_UNCHANGED.to_string()));
    }

    let existing = store
        .find_service(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND_OR_UNCHANGED.to_string()))?;

    if !session.owns(existing.get_str("providerEmail").ok()) {
        log::warn!("🚫 {} tried to update service {} they do not own", session.email, id);
        return Err(AppError::Forbidden(
            "Forbidden: you do not own this service".to_string(),
        ));
    }

    let summary = store.update_service(id, &session.email, changes).await?;
    if summary.modified == 0 {
        return Err(AppError::NotFound(NOT_FOUND_OR_UNCHANGED.to_string()));
    }

    Ok(summary)
}

/// Deleting an id that no longer exists is not an error: the count is 0.
pub async fn delete_service(
    store: &dyn MarketplaceStore,
    session: &Claims,
    raw_id: &str,
) -> Result<u64, AppError> {
    let id = parse_object_id(raw_id)?;

    if let Some(existing) = store.find_service(id).await? {
        if !session.owns(existing.get_str("providerEmail").ok()) {
            log::warn!("🚫 {} tried to delete service {} they do not own", session.email, id);
            return Err(AppError::Forbidden(
                "Forbidden: you do not own this service".to_string(),
            ));
        }
    }

    store.delete_service(id, &session.email).await
}
