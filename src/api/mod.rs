pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod health;
pub mod swagger;
pub mod users;


use actix_web::{error::JsonPayloadError, guard, web, HttpRequest, HttpResponse};

use crate::middleware::AuthMiddleware;
use crate::models::MessageResponse;
use crate::utils::AppError;

/// Route table. Storage, `TokenService` and `CookiePolicy` are registered
/// as app data by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/", web::get().to(health::liveness))
        .route("/health", web::get().to(health::health_check))
        // Session
        .route("/jwt", web::post().to(auth::issue_token))
        .route("/logout", web::post().to(auth::logout))
        // Users
        .route("/user", web::post().to(users::upsert_user))
        // Services: reads are public, mutations need a session
        .service(
            web::resource("/services/random/6")
                .route(web::get().to(catalog::random_services)),
        )
        .service(
            web::resource("/services")
                .guard(guard::Get())
                .route(web::get().to(catalog::list_services)),
        )
        .service(
            web::resource("/services")
                .guard(guard::Post())
                .wrap(AuthMiddleware)
                .route(web::post().to(catalog::create_service)),
        )
        .service(
            web::resource("/services/{id}")
                .guard(guard::Get())
                .route(web::get().to(catalog::get_service)),
        )
        .service(
            web::resource("/services/{id}")
                .guard(guard::Any(guard::Patch()).or(guard::Delete()))
                .wrap(AuthMiddleware)
                .route(web::patch().to(catalog::update_service))
                .route(web::delete().to(catalog::delete_service)),
        )
        // Bookings: every route needs a session
        .service(
            web::scope("/bookings")
                .wrap(AuthMiddleware)
                .route("", web::get().to(bookings::list_bookings))
                .route("", web::post().to(bookings::create_booking))
                .route("/{id}", web::patch().to(bookings::update_booking_status))
                .route("/{id}", web::delete().to(bookings::delete_booking)),
        );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidRequest(format!("Invalid JSON body: {}", err)).into()
}

/// Storage faults on a route become a 500 with the route's own message;
/// client errors pass through unchanged.
pub(crate) fn fault_response(err: AppError, message: &str) -> Result<HttpResponse, AppError> {
    if err.is_server_fault() {
        log::error!("❌ {}: {}", message, err);
        Ok(HttpResponse::InternalServerError().json(MessageResponse::new(message)))
    } else {
        Err(err)
    }
}
