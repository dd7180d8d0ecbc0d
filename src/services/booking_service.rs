use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};

use crate::database::{MarketplaceStore, UpdateSummary};
use crate::models::{
    from_json, parse_object_id, timestamp_now, BookingScope, Claims, DEFAULT_SERVICE_STATUS,
};
use crate::utils::AppError;

pub const NOT_FOUND_OR_UNCHANGED: &str = "Booking not found or already updated";

fn is_party(session: &Claims, booking: &Document) -> bool {
    session.owns(booking.get_str("userEmail").ok())
        || session.owns(booking.get_str("providerEmail").ok())
}

/// Books a service for the session's user.
pub async fn create_booking(
    store: &dyn MarketplaceStore,
    session: &Claims,
    body: Map<String, Value>,
) -> Result<ObjectId, AppError> {
    let mut booking = from_json(body)?;
    booking.remove("_id");

    match booking.get("userEmail") {
        None | Some(Bson::Null) => {
            booking.insert("userEmail", session.email.as_str());
        }
        Some(Bson::String(customer)) if *customer == session.email => {}
        Some(_) => {
            return Err(AppError::Forbidden(
                "Forbidden: bookings can only be made for your own account".to_string(),
            ))
        }
    }

    if !booking.contains_key("serviceStatus") {
        booking.insert("serviceStatus", DEFAULT_SERVICE_STATUS);
    }
    booking.insert("created_at", timestamp_now());

    store.insert_booking(booking).await
}

/// Lists bookings, newest first. A filtered listing must target the
/// session's own email.
pub async fn list_bookings(
    store: &dyn MarketplaceStore,
    session: &Claims,
    scope: &BookingScope,
) -> Result<Vec<Document>, AppError> {
    if let Some(email) = scope.email() {
        if email != session.email {
            log::warn!("🚫 {} tried to list bookings of {}", session.email, email);
            return Err(AppError::Forbidden(
                "Forbidden: you can only list your own bookings".to_string(),
            ));
        }
    }

    store.find_bookings(scope).await
}

pub async fn update_status(
    store: &dyn MarketplaceStore,
    session: &Claims,
    raw_id: &str,
    service_status: Option<String>,
) -> Result<UpdateSummary, AppError> {
    let id = parse_object_id(raw_id)?;

    let status = service_status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest("serviceStatus is required".to_string()))?;

    let booking = store
        .find_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND_OR_UNCHANGED.to_string()))?;

    if !is_party(session, &booking) {
        log::warn!("🚫 {} tried to update booking {} they are not part of", session.email, id);
        return Err(AppError::Forbidden(
            "Forbidden: you are not part of this booking".to_string(),
        ));
    }

    let summary = store.update_booking_status(id, &session.email, &status).await?;
    if summary.modified == 0 {
        return Err(AppError::NotFound(NOT_FOUND_OR_UNCHANGED.to_string()));
    }

    Ok(summary)
}

/// Deleting an id that no longer exists is not an error: the count is 0.
pub async fn delete_booking(
    store: &dyn MarketplaceStore,
    session: &Claims,
    raw_id: &str,
) -> Result<u64, AppError> {
    let id = parse_object_id(raw_id)?;

    if let Some(booking) = store.find_booking(id).await? {
        if !is_party(session, &booking) {
            log::warn!("🚫 {} tried to delete booking {} they are not part of", session.email, id);
            return Err(AppError::Forbidden(
                "Forbidden: you are not part of this booking".to_string(),
            ));
        }
    }

    store.delete_booking(id, &session.email).await
}
