use serde::Deserialize;

use super::catalog::non_blank;

pub const DEFAULT_SERVICE_STATUS: &str = "pending";

/// Query string of `GET /bookings`
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingQuery {
    /// Bookings received by this provider (takes precedence over `userEmail`)
    #[serde(rename = "providerEmail")]
    pub provider_email: Option<String>,
    /// Bookings made by this customer
    #[serde(rename = "userEmail")]
    pub user_email: Option<String>,
}

/// Which bookings a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingScope {
    Provider(String),
    Customer(String),
    All,
}

impl BookingScope {
    /// Email the scope is restricted to, if any.
    pub fn email(&self) -> Option<&str> {
        match self {
            BookingScope::Provider(email) | BookingScope::Customer(email) => Some(email),
            BookingScope::All => None,
        }
    }
}

impl From<BookingQuery> for BookingScope {
    fn from(query: BookingQuery) -> Self {
        match (non_blank(query.provider_email), non_blank(query.user_email)) {
            (Some(provider), _) => BookingScope::Provider(provider),
            (None, Some(user)) => BookingScope::Customer(user),
            (None, None) => BookingScope::All,
        }
    }
}

/// Body of `PATCH /bookings/{id}`
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StatusUpdateRequest {
    #[serde(rename = "serviceStatus")]
    pub service_status: Option<String>,
}
