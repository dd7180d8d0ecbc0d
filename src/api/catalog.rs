use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

use super::fault_response;
use crate::database::MarketplaceStore;
use crate::models::{
    into_json, into_json_list, Claims, DeleteAck, InsertAck, MessageResponse, MutationResponse,
    ServiceFilter, ServiceQuery, UpdateAck,
};
use crate::services::catalog_service;
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/services",
    tag = "Services",
    params(ServiceQuery),
    responses(
        (status = 200, description = "Matching services"),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn list_services(
    store: web::Data<dyn MarketplaceStore>,
    query: web::Query<ServiceQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = ServiceFilter::from(query.into_inner());
    log::info!(
        "🔎 GET /services - search: {:?}, providerEmail: {:?}",
        filter.search,
        filter.provider_email
    );

    match catalog_service::list_services(store.get_ref(), &filter).await {
        Ok(services) => Ok(HttpResponse::Ok().json(into_json_list(services))),
        Err(e) => fault_response(e, "Failed to fetch services"),
    }
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ObjectId (hex)")),
    responses(
        (status = 200, description = "The service, or null when it does not exist"),
        (status = 400, description = "Malformed identifier", body = MessageResponse)
    )
)]
pub async fn get_service(
    store: web::Data<dyn MarketplaceStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service_id = path.into_inner();
    log::info!("📄 GET /services/{}", service_id);

    let service = catalog_service::get_service(store.get_ref(), &service_id).await?;
    Ok(HttpResponse::Ok().json(service.map(into_json)))
}

#[utoipa::path(
    get,
    path = "/services/random/6",
    tag = "Services",
    responses(
        (status = 200, description = "Up to six random services"),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn random_services(
    store: web::Data<dyn MarketplaceStore>,
) -> Result<HttpResponse, AppError> {
    log::info!("🎲 GET /services/random/6");

    match catalog_service::random_services(store.get_ref()).await {
        Ok(services) => Ok(HttpResponse::Ok().json(into_json_list(services))),
        Err(e) => fault_response(e, "Failed to fetch random services"),
    }
}

/// POST /services - Publishes a service under the session's email
pub async fn create_service(
    user: web::ReqData<Claims>,
    store: web::Data<dyn MarketplaceStore>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    log::info!("➕ POST /services - provider: {}", user.email);

    let id = catalog_service::create_service(store.get_ref(), &user, body.into_inner()).await?;

    log::info!("✅ Service created: {}", id);
    Ok(HttpResponse::Ok().json(InsertAck {
        acknowledged: true,
        inserted_id: id.to_hex(),
    }))
}

/// PATCH /services/{id} - Merges the given fields into the service
pub async fn update_service(
    user: web::ReqData<Claims>,
    store: web::Data<dyn MarketplaceStore>,
    path: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let service_id = path.into_inner();
    log::info!("🔧 PATCH /services/{} - provider: {}", service_id, user.email);

    match catalog_service::update_service(store.get_ref(), &user, &service_id, body.into_inner())
        .await
    {
        Ok(summary) => Ok(HttpResponse::Ok().json(MutationResponse {
            message: "Service updated successfully".to_string(),
            result: UpdateAck::from(summary),
        })),
        Err(e) => fault_response(e, "Failed to update service"),
    }
}

#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ObjectId (hex)")),
    responses(
        (status = 200, description = "Deletion acknowledgement (deletedCount 0 when absent)", body = DeleteAck),
        (status = 401, description = "No session cookie", body = MessageResponse),
        (status = 403, description = "Invalid token or not the owner", body = MessageResponse)
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_service(
    user: web::ReqData<Claims>,
    store: web::Data<dyn MarketplaceStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service_id = path.into_inner();
    log::info!("🗑️  DELETE /services/{} - provider: {}", service_id, user.email);

    let deleted_count = catalog_service::delete_service(store.get_ref(), &user, &service_id).await?;
    Ok(HttpResponse::Ok().json(DeleteAck {
        acknowledged: true,
        deleted_count,
    }))
}
