use daydream_core::admin_access::DEFAULT_ADMIN_DOMAIN;
use daydream_core::clip_ranking::CollisionPolicy;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the token secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Email domain whose users may call `/api/admin/*`.
    pub admin_domain: String,
    /// How slot assignment treats clips that lose a priority collision.
    pub collision_policy: CollisionPolicy,
    /// Identity token verification settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `ADMIN_DOMAIN`              | `livepeer.org`          |
    /// | `PRIORITY_COLLISION_POLICY` | `demote`                |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let admin_domain = std::env::var("ADMIN_DOMAIN")
            .map(|d| d.trim().trim_start_matches('@').to_string())
            .ok()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_DOMAIN.to_string());

        let collision_policy = match std::env::var("PRIORITY_COLLISION_POLICY") {
            Ok(value) => CollisionPolicy::from_str_value(value.trim())
                .unwrap_or_else(|e| panic!("PRIORITY_COLLISION_POLICY: {e}")),
            Err(_) => CollisionPolicy::default(),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            admin_domain,
            collision_policy,
            jwt,
        }
    }
}
