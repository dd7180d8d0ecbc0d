use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

use super::fault_response;
use crate::database::MarketplaceStore;
use crate::models::{
    into_json_list, BookingQuery, BookingScope, Claims, DeleteAck, InsertAck, MessageResponse,
    MutationResponse, StatusUpdateRequest, UpdateAck,
};
use crate::services::booking_service;
use crate::utils::AppError;

/// POST /bookings - Books a service for the session's user
pub async fn create_booking(
    user: web::ReqData<Claims>,
    store: web::Data<dyn MarketplaceStore>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    log::info!("📅 POST /bookings - user: {}", user.email);

    let id = booking_service::create_booking(store.get_ref(), &user, body.into_inner()).await?;

    log::info!("✅ Booking created: {}", id);
    Ok(HttpResponse::Ok().json(InsertAck {
        acknowledged: true,
        inserted_id: id.to_hex(),
    }))
}

#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    params(BookingQuery),
    responses(
        (status = 200, description = "Matching bookings, newest first"),
        (status = 401, description = "No session cookie", body = MessageResponse),
        (status = 403, description = "Invalid token or another account's bookings", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse)
    ),
    security(("session_cookie" = []))
)]
pub async fn list_bookings(
    user: web::ReqData<Claims>,
    store: web::Data<dyn MarketplaceStore>,
    query: web::Query<BookingQuery>,
) -> Result<HttpResponse, AppError> {
    let scope = BookingScope::from(query.into_inner());
    log::info!("📋 GET /bookings - {:?} (session: {})", scope, user.email);

    match booking_service::list_bookings(store.get_ref(), &user, &scope).await {
        Ok(bookings) => {
            log::info!("✅ Listed {} bookings", bookings.len());
            Ok(HttpResponse::Ok().json(into_json_list(bookings)))
        }
        Err(e) => fault_response(e, "Internal Server Error"),
    }
}

#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ObjectId (hex)")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = MutationResponse),
        (status = 404, description = "Booking not found or already updated", body = MessageResponse)
    ),
    security(("session_cookie" = []))
)]
pub async fn update_booking_status(
    user: web::ReqData<Claims>,
    store: web::Data<dyn MarketplaceStore>,
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();
    log::info!("🔧 PATCH /bookings/{} - by {}", booking_id, user.email);

    let summary = booking_service::update_status(
        store.get_ref(),
        &user,
        &booking_id,
        body.into_inner().service_status,
    )
    .await?;

    Ok(HttpResponse::Ok().json(MutationResponse {
        message: "Status updated successfully".to_string(),
        result: UpdateAck::from(summary),
    }))
}

#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ObjectId (hex)")),
    responses(
        (status = 200, description = "Deletion acknowledgement (deletedCount 0 when absent)", body = DeleteAck)
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_booking(
    user: web::ReqData<Claims>,
    store: web::Data<dyn MarketplaceStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();
    log::info!("🗑️  DELETE /bookings/{} - by {}", booking_id, user.email);

    let deleted_count = booking_service::delete_booking(store.get_ref(), &user, &booking_id).await?;
    Ok(HttpResponse::Ok().json(DeleteAck {
        acknowledged: true,
        deleted_count,
    }))
}
