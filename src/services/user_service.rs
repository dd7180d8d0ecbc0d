use serde_json::{Map, Value};

use crate::database::{MarketplaceStore, UpdateSummary};
use crate::models::{from_json, timestamp_now};
use crate::utils::AppError;

/// The profile is stored through `$setOnInsert`, where such names would be
/// read as operators or nested paths.
fn is_plain_field(key: &str) -> bool {
    !key.is_empty() && !key.starts_with('$') && !key.contains('.')
}

/// Saves a user on login: refreshes `last_loggedIn` when the email is
/// known, inserts the submitted profile otherwise.
pub async fn upsert_user(
    store: &dyn MarketplaceStore,
    body: Map<String, Value>,
) -> Result<UpdateSummary, AppError> {
    let email = match body.get("email") {
        Some(Value::String(email)) if !email.trim().is_empty() => email.clone(),
        _ => return Err(AppError::InvalidRequest("email is required".to_string())),
    };

    if let Some(key) = body.keys().find(|key| !is_plain_field(key)) {
        return Err(AppError::InvalidRequest(format!(
            "Invalid profile field '{}': names cannot start with '$' or contain '.'",
            key
        )));
    }

    let mut profile = from_json(body)?;
    profile.remove("created_at");

    let summary = store.upsert_user(&email, profile, &timestamp_now()).await?;

    if summary.upserted_id.is_some() {
        log::info!("👤 Created user {}", email);
    } else {
        log::info!("👤 Refreshed last login for {}", email);
    }

    Ok(summary)
}
