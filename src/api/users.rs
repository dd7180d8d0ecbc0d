use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

use crate::database::MarketplaceStore;
use crate::models::UpdateAck;
use crate::services::user_service;
use crate::utils::AppError;

/// POST /user - Saves the user on login (insert once, then refresh last login)
pub async fn upsert_user(
    store: web::Data<dyn MarketplaceStore>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /user");

    let summary = user_service::upsert_user(store.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UpdateAck::from(summary)))
}
