//! Signing keys for access tokens.
//!
//! The identity provider publishes its public keys as a JSON Web Key Set (JWKS). [`JwksCache`] fetches the set on
//! first use and keeps it in memory for the life of the process, or until the optional refresh interval elapses.
//! Tests (and air-gapped deployments) can hand the cache a fixed key set instead via [`KeySetSource::Static`].

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use base64::{decode_config, URL_SAFE_NO_PAD};
use jwt_compact::alg::RsaPublicKey;
use log::*;
use rsa::BigUint;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::errors::AuthError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    pub keys: Vec<JsonWebKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    #[serde(default)]
    pub kid: Option<String>,
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// RSA modulus, base64url without padding
    #[serde(default)]
    pub n: Option<String>,
    /// RSA public exponent, base64url without padding
    #[serde(default)]
    pub e: Option<String>,
}

impl JsonWebKey {
    fn to_rsa_key(&self) -> Result<RsaPublicKey, String> {
        if self.kty != "RSA" {
            return Err(format!("key type {} is not RSA", self.kty));
        }
        let n = self.n.as_deref().ok_or("missing modulus")?;
        let e = self.e.as_deref().ok_or("missing exponent")?;
        let n = decode_config(n, URL_SAFE_NO_PAD).map_err(|e| format!("modulus is not base64url. {e}"))?;
        let e = decode_config(e, URL_SAFE_NO_PAD).map_err(|e| format!("exponent is not base64url. {e}"))?;
        RsaPublicKey::new(BigUint::from_bytes_be(&n), BigUint::from_bytes_be(&e)).map_err(|e| e.to_string())
    }
}

/// The usable RSA keys of a key set, indexed by key id.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, RsaPublicKey>,
}

impl KeySet {
    pub fn get(&self, kid: &str) -> Option<&RsaPublicKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<&JsonWebKeySet> for KeySet {
    fn from(jwks: &JsonWebKeySet) -> Self {
        let keys = jwks
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.kid.as_ref()?;
                match jwk.to_rsa_key() {
                    Ok(key) => Some((kid.clone(), key)),
                    Err(e) => {
                        debug!("🔐️ Skipping key {kid} in key set: {e}");
                        None
                    },
                }
            })
            .collect();
        Self { keys }
    }
}

pub enum KeySetSource {
    Remote { url: String, client: reqwest::Client },
    Static(JsonWebKeySet),
}

impl KeySetSource {
    /// A key set served over HTTP. `timeout` bounds both the connection attempt and the whole request, so a hung
    /// identity provider cannot hold the cache lock indefinitely.
    pub fn remote(url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::KeySetUnavailable(format!("Could not build the key set client. {e}")))?;
        Ok(Self::Remote { url: url.to_string(), client })
    }

    async fn load(&self) -> Result<KeySet, AuthError> {
        match self {
            Self::Static(jwks) => Ok(KeySet::from(jwks)),
            Self::Remote { url, client } => {
                debug!("🔐️ Fetching signing keys from {url}");
                let jwks = client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?
                    .json::<JsonWebKeySet>()
                    .await
                    .map_err(|e| AuthError::KeySetUnavailable(format!("Key set is not valid JSON. {e}")))?;
                let keys = KeySet::from(&jwks);
                info!("🔐️ Loaded {} signing keys from {url}", keys.len());
                Ok(keys)
            },
        }
    }
}

struct CachedKeys {
    keys: Arc<KeySet>,
    loaded_at: Instant,
}

/// Lazily loaded, shared copy of the identity provider's key set.
///
/// A failed load is not cached, so the next request tries again.
pub struct JwksCache {
    source: KeySetSource,
    ttl: Option<Duration>,
    cached: RwLock<Option<CachedKeys>>,
}

impl JwksCache {
    /// `ttl` of `None` keeps the first successfully loaded key set forever.
    pub fn new(source: KeySetSource, ttl: Option<Duration>) -> Self {
        Self { source, ttl, cached: RwLock::new(None) }
    }

    pub async fn key_set(&self) -> Result<Arc<KeySet>, AuthError> {
        if let Some(keys) = self.fresh(&*self.cached.read().await) {
            return Ok(keys);
        }
        let mut cached = self.cached.write().await;
        // Another request may have refreshed the set while we waited for the lock
        if let Some(keys) = self.fresh(&cached) {
            return Ok(keys);
        }
        let keys = Arc::new(self.source.load().await?);
        *cached = Some(CachedKeys { keys: Arc::clone(&keys), loaded_at: Instant::now() });
        Ok(keys)
    }

    fn fresh(&self, cached: &Option<CachedKeys>) -> Option<Arc<KeySet>> {
        let entry = cached.as_ref()?;
        match self.ttl {
            Some(ttl) if entry.loaded_at.elapsed() >= ttl => None,
            _ => Some(Arc::clone(&entry.keys)),
        }
    }
}
