use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Servora API",
        version = "1.0.0",
        description = "Service-booking marketplace backend. \n\n**Authentication:** `POST /jwt` sets an HTTP-only `token` cookie. Creating, updating and deleting services and every bookings route require it, and only the owning provider or booking party may mutate a record.\n\n`POST /jwt`, `POST /user`, `POST /services`, `PATCH /services/{id}` and `POST /bookings` take free-form JSON objects."
    ),
    paths(
        // Health
        crate::api::health::liveness,
        crate::api::health::health_check,

        // Auth
        crate::api::auth::logout,

        // Services
        crate::api::catalog::list_services,
        crate::api::catalog::get_service,
        crate::api::catalog::random_services,
        crate::api::catalog::delete_service,

        // Bookings
        crate::api::bookings::list_bookings,
        crate::api::bookings::update_booking_status,
        crate::api::bookings::delete_booking,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::MessageResponse,
            crate::models::SuccessResponse,
            crate::models::InsertAck,
            crate::models::UpdateAck,
            crate::models::DeleteAck,
            crate::models::MutationResponse,
            crate::models::StatusUpdateRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and health endpoints."),
        (name = "Auth", description = "Session cookie issuance and logout."),
        (name = "Services", description = "Services published by providers. Reads are public."),
        (name = "Bookings", description = "Bookings of services. Every route requires a session."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "token",
                    "Session JWT issued by POST /jwt",
                ))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();

        for path in ["/", "/health", "/logout", "/services", "/services/{id}", "/services/random/6", "/bookings", "/bookings/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing path {}", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("session_cookie"));
    }
}
