use crate::utils::AppError;

/// Accepted range for `TOKEN_TTL_DAYS`.
pub const TOKEN_TTL_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=36500;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "https://ph-assignment-11-8fc18.web.app",
    "https://ph-assignment-11-8fc18.firebaseapp.com",
    "http://localhost:5173",
    "http://localhost:5174",
];

/// Deployment environment. Only controls cookie security attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub token_secret: String,
    pub token_ttl_days: i64,
    pub environment: Environment,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| AppError::Configuration(format!("{} must be set", key)))
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::Configuration(format!("PORT is not a valid port: {}", e)))?,
            None => 3000,
        };

        let token_ttl_days = match get("TOKEN_TTL_DAYS") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| {
                AppError::Configuration(format!("TOKEN_TTL_DAYS is not a number: {}", e))
            })?,
            None => 365,
        };
        if !TOKEN_TTL_DAYS_RANGE.contains(&token_ttl_days) {
            return Err(AppError::Configuration(format!(
                "TOKEN_TTL_DAYS must be between {} and {}, got {}",
                TOKEN_TTL_DAYS_RANGE.start(),
                TOKEN_TTL_DAYS_RANGE.end(),
                token_ttl_days
            )));
        }

        let allowed_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            mongodb_uri: required("MONGODB_URI")?,
            database_name: get("MONGODB_DATABASE").unwrap_or_else(|| "servoraDB".to_string()),
            token_secret: required("ACCESS_TOKEN_SECRET")?,
            token_ttl_days,
            environment: Environment::parse(get("APP_ENV").or_else(|| get("NODE_ENV"))),
            allowed_origins,
        })
    }
}
