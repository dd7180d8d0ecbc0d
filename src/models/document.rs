use chrono::{SecondsFormat, Utc};
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};

use crate::utils::AppError;

/// Parses a path segment into a storage key.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::InvalidIdentifier(raw.to_string()))
}

/// Current instant as an RFC 3339 UTC string with millisecond precision.
///
/// Fixed width, so lexicographic order matches chronological order.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts a client-supplied JSON object into a BSON document.
pub fn from_json(body: Map<String, Value>) -> Result<Document, AppError> {
    mongodb::bson::to_document(&body).map_err(|e| AppError::InvalidRequest(e.to_string()))
}

/// Renders a stored document as JSON, with `_id` as a plain hex string.
pub fn into_json(mut document: Document) -> Value {
    if let Ok(id) = document.get_object_id("_id") {
        document.insert("_id", id.to_hex());
    }
    Bson::Document(document).into_relaxed_extjson()
}

pub fn into_json_list(documents: Vec<Document>) -> Value {
    Value::Array(documents.into_iter().map(into_json).collect())
}
