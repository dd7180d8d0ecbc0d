use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

use crate::models::{MessageResponse, SuccessResponse};
use crate::services::auth_service::{CookiePolicy, TokenService};
use crate::utils::AppError;

/// POST /jwt - Issues the session cookie for the submitted identity
pub async fn issue_token(
    tokens: web::Data<TokenService>,
    cookies: web::Data<CookiePolicy>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let identity = body.into_inner();
    let email = identity
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or("N/A")
        .to_string();

    log::info!("🔐 POST /jwt - email: {}", email);

    let token = tokens.issue(identity)?;

    Ok(HttpResponse::Ok()
        .cookie(cookies.session_cookie(token, tokens.ttl()))
        .json(SuccessResponse { success: true }))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    )
)]
pub async fn logout(cookies: web::Data<CookiePolicy>) -> HttpResponse {
    log::info!("👋 POST /logout");

    HttpResponse::Ok()
        .cookie(cookies.removal_cookie())
        .json(MessageResponse::new("Logged out successfully"))
}
