use std::{env, time::Duration as StdDuration};

use chrono::Duration;
use drinks_engine::sqlite::db::db_url;
use log::*;

use crate::errors::ServerError;

const DEFAULT_DRINKS_HOST: &str = "127.0.0.1";
const DEFAULT_DRINKS_PORT: u16 = 8360;
const DEFAULT_TOKEN_LEEWAY: Duration = Duration::seconds(60);
const DEFAULT_JWKS_TIMEOUT: StdDuration = StdDuration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, the catalog is wiped and seeded with a single drink at startup. **DANGER**
    pub reset_database: bool,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DRINKS_HOST.to_string(),
            port: DEFAULT_DRINKS_PORT,
            database_url: db_url(),
            reset_database: false,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("DRINKS_HOST").ok().unwrap_or_else(|| DEFAULT_DRINKS_HOST.into());
        let port = env::var("DRINKS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DRINKS_PORT. {e} Using the default, {DEFAULT_DRINKS_PORT}, \
                         instead."
                    );
                    DEFAULT_DRINKS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DRINKS_PORT);
        let database_url = db_url();
        let reset_database = env::var("DRINKS_RESET_DATABASE").map(|s| is_truthy(&s)).unwrap_or(false);
        if reset_database {
            warn!("🪛️ DRINKS_RESET_DATABASE is set. The catalog will be wiped at startup.");
        }
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            error!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Protected routes \
                 will reject every request until this is fixed."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, reset_database, auth }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The identity provider's domain, e.g. `my-tenant.us.auth0.com`
    pub domain: String,
    /// Expected `iss` claim. Always `https://<domain>/`.
    pub issuer: String,
    /// Expected `aud` claim, i.e. the API identifier registered with the identity provider.
    pub audience: String,
    pub jwks_url: String,
    /// How long a fetched key set is trusted before it is fetched again. `None` keeps it for the life of the process.
    pub jwks_cache_ttl: Option<StdDuration>,
    /// Upper bound on a single key set fetch, connection included.
    pub jwks_timeout: StdDuration,
    /// Clock skew tolerated when checking token expiry.
    pub leeway: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: String::default(),
            issuer: String::default(),
            audience: String::default(),
            jwks_url: String::default(),
            jwks_cache_ttl: None,
            jwks_timeout: DEFAULT_JWKS_TIMEOUT,
            leeway: DEFAULT_TOKEN_LEEWAY,
        }
    }
}

impl AuthConfig {
    pub fn new(domain: &str, audience: &str) -> Self {
        let domain = domain.trim_end_matches('/').to_string();
        Self {
            issuer: format!("https://{domain}/"),
            jwks_url: format!("https://{domain}/.well-known/jwks.json"),
            audience: audience.to_string(),
            domain,
            ..Default::default()
        }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let domain = env::var("DRINKS_AUTH0_DOMAIN")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [DRINKS_AUTH0_DOMAIN]")))?;
        let audience = env::var("DRINKS_API_AUDIENCE")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [DRINKS_API_AUDIENCE]")))?;
        let mut config = Self::new(&domain, &audience);
        if let Ok(url) = env::var("DRINKS_JWKS_URL") {
            info!("🪛️ Using {url} for the signing key set instead of the identity provider default");
            config.jwks_url = url;
        }
        config.jwks_cache_ttl = env::var("DRINKS_JWKS_CACHE_TTL").ok().and_then(|s| {
            s.parse::<u64>()
                .map_err(|e| warn!("🪛️ Invalid DRINKS_JWKS_CACHE_TTL ({s}). {e}. The key set will never be refreshed."))
                .ok()
                .map(StdDuration::from_secs)
        });
        config.jwks_timeout = env::var("DRINKS_JWKS_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid DRINKS_JWKS_TIMEOUT ({s}). {e}. Using the default instead."))
                    .ok()
            })
            .map(StdDuration::from_secs)
            .unwrap_or(DEFAULT_JWKS_TIMEOUT);
        config.leeway = env::var("DRINKS_TOKEN_LEEWAY")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| warn!("🪛️ Invalid DRINKS_TOKEN_LEEWAY ({s}). {e}. Using the default instead."))
                    .ok()
            })
            .map(Duration::seconds)
            .unwrap_or(DEFAULT_TOKEN_LEEWAY);
        Ok(config)
    }
}

fn is_truthy(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "1" | "true" | "yes")
}
