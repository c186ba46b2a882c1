use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. When absent the API runs on the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiry_seconds: u64,
    pub host: String,
    pub port: u16,
    /// Origin of the admin console, allowed by CORS on the admin routes.
    pub admin_origin: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".into())
                .parse()?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiry_seconds: env::var("JWT_EXPIRY_SECONDS")
                .unwrap_or_else(|_| "86400".into())
                .parse()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".into())
                .parse()?,
            admin_origin: env::var("ADMIN_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        })
    }

    /// Configuration for an in-memory server, used by local tooling and tests.
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            db_max_connections: 1,
            jwt_secret: jwt_secret.into(),
            jwt_expiry_seconds: 86400,
            host: "127.0.0.1".into(),
            port: 0,
            admin_origin: "http://localhost:5173".into(),
        }
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
