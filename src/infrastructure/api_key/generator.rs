//! API key generation
//!
//! Keys are random, URL-safe and only ever shown once. Storage keeps a
//! SHA-256 hash plus a short display prefix; lookups go through the hash.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Default prefix for issued keys
pub const DEFAULT_KEY_PREFIX: &str = "nla_live_";

const DISPLAY_CHARS: usize = 6;

/// Result of generating a new API key
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full API key (only shown once at creation)
    pub key: String,
    /// Type prefix plus the first random characters, safe to display
    pub prefix: String,
    /// The hashed key for storage
    pub hash: String,
}

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    prefix: String,
    key_bytes: usize,
}

impl ApiKeyGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key_bytes: 32,
        }
    }

    /// Set the number of random bytes
    pub fn with_key_bytes(mut self, bytes: usize) -> Self {
        self.key_bytes = bytes;
        self
    }

    /// Generate a new API key
    pub fn generate(&self) -> GeneratedApiKey {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let encoded = URL_SAFE_NO_PAD.encode(&random_bytes);
        let key = format!("{}{}", self.prefix, encoded);
        let prefix = format!(
            "{}{}",
            self.prefix,
            &encoded[..DISPLAY_CHARS.min(encoded.len())]
        );
        let hash = hash_key(&key);

        GeneratedApiKey { key, prefix, hash }
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

/// Hash an API key for storage and lookup
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let result = hasher.finalize();
    format!("sha256${}", URL_SAFE_NO_PAD.encode(result))
}
