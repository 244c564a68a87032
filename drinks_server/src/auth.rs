use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::HeaderValue, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use jwt_compact::{alg::Rsa, AlgorithmExt, TimeOptions, UntrustedToken};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
    jwks::{JwksCache, KeySetSource},
};

pub const ACCEPTED_ALGORITHM: &str = "RS256";

/// The `aud` claim. Identity providers send either a single audience or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::Single(a) => a == audience,
            Self::Multiple(list) => list.iter().any(|a| a == audience),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub aud: Audience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl JwtClaims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.as_ref().map(|p| p.iter().any(|s| s == permission)).unwrap_or(false)
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(header: Option<&HeaderValue>) -> Result<String, AuthError> {
    let value = header.ok_or(AuthError::MissingAuthHeader)?;
    let value = value
        .to_str()
        .map_err(|e| AuthError::MalformedAuthHeader(format!("Header is not valid text. {e}")))?;
    let parts = value.split_whitespace().collect::<Vec<&str>>();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(token.to_string()),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => {
            Err(AuthError::MalformedAuthHeader("Authorization header must start with \"Bearer\".".into()))
        },
        [_] => Err(AuthError::MalformedAuthHeader("Token not found.".into())),
        _ => Err(AuthError::MalformedAuthHeader("Authorization header must be bearer token.".into())),
    }
}

pub fn check_permission(claims: &JwtClaims, permission: &str) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::MissingPermissions);
    }
    if claims.has_permission(permission) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions(format!("Permission '{permission}' not found.")))
    }
}

/// Verifies RS256 access tokens issued by the configured identity provider.
pub struct TokenVerifier {
    issuer: String,
    audience: String,
    leeway: Duration,
    keys: JwksCache,
}

impl TokenVerifier {
    pub fn new(issuer: &str, audience: &str, leeway: Duration, keys: JwksCache) -> Self {
        Self { issuer: issuer.to_string(), audience: audience.to_string(), leeway, keys }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let source = KeySetSource::remote(&config.jwks_url, config.jwks_timeout)?;
        let keys = JwksCache::new(source, config.jwks_cache_ttl);
        Ok(Self::new(&config.issuer, &config.audience, config.leeway, keys))
    }

    pub async fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let untrusted_token =
            UntrustedToken::new(token).map_err(|e| AuthError::PoorlyFormattedToken(format!("{e:?}")))?;
        let algorithm = untrusted_token.algorithm();
        if algorithm != ACCEPTED_ALGORITHM {
            return Err(AuthError::UnsupportedAlgorithm(algorithm.to_string()));
        }
        let kid = untrusted_token
            .header()
            .key_id
            .clone()
            .ok_or_else(|| AuthError::PoorlyFormattedToken("Token header has no key id.".into()))?;
        let key_set = self.keys.key_set().await?;
        let key = key_set.get(&kid).ok_or_else(|| AuthError::UnknownSigningKey(kid.clone()))?;
        let rs256 = Rsa::rs256();
        let token = rs256
            .validator::<JwtClaims>(key)
            .validate(&untrusted_token)
            .map_err(|e| AuthError::ValidationError(format!("{e}")))?;
        let (_, claims) = token.into_parts();
        let time_options = TimeOptions::new(self.leeway, Utc::now);
        claims.validate_expiration(&time_options).map_err(|e| AuthError::ValidationError(format!("{e}")))?;
        let claims = claims.custom;
        if claims.iss != self.issuer {
            return Err(AuthError::InvalidClaims(format!("Unexpected issuer {}.", claims.iss)));
        }
        if !claims.aud.contains(&self.audience) {
            return Err(AuthError::InvalidClaims("Token was not issued for this audience.".into()));
        }
        trace!("🔐️ Token for {} verified", claims.sub);
        Ok(claims)
    }
}

/// Handlers behind the ACL middleware can take the verified claims as an argument.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned().ok_or_else(|| {
            warn!("🔐️ No JWT claims found in request extensions. Is the route missing its access guard?");
            ServerError::AuthenticationError(AuthError::ClaimsNotFound)
        });
        ready(claims)
    }
}
