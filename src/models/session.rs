use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims carried by the session cookie.
///
/// `email` is the caller's identity. Any other fields submitted to `/jwt`
/// travel along in `extra` and are not consulted for authorization.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    pub iat: i64, // issued at
    pub exp: i64, // expiration
    pub jti: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn owns(&self, owner_email: Option<&str>) -> bool {
        owner_email == Some(self.email.as_str())
    }
}
