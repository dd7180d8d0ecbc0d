use serde::Deserialize;

/// Number of services returned by the random sample route.
pub const RANDOM_SAMPLE_SIZE: u32 = 6;

/// Query string of `GET /services`
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceQuery {
    /// Case-insensitive substring matched against the service name
    pub search: Option<String>,
    /// Exact provider email
    #[serde(rename = "providerEmail")]
    pub provider_email: Option<String>,
}

/// Normalized service listing filter. Blank values are dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceFilter {
    pub search: Option<String>,
    pub provider_email: Option<String>,
}

impl From<ServiceQuery> for ServiceFilter {
    fn from(query: ServiceQuery) -> Self {
        ServiceFilter {
            search: non_blank(query.search),
            provider_email: non_blank(query.provider_email),
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
