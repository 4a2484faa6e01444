use rand::rngs::OsRng;
use rand::RngCore;

pub const KEY_PREFIX: &str = "nt_";
/// 32 random bytes, i.e. 256 bits of entropy.
pub const KEY_BYTES: usize = 32;

/// Produces opaque API keys from the operating system's CSPRNG.
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    prefix: String,
    key_bytes: usize,
}

impl ApiKeyGenerator {
    pub fn new() -> Self {
        Self {
            prefix: KEY_PREFIX.to_string(),
            key_bytes: KEY_BYTES,
        }
    }

    pub fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.key_bytes];
        OsRng.fill_bytes(&mut random_bytes);
        format!("{}{}", self.prefix, hex::encode(random_bytes))
    }

    /// Shortened form for logs: prefix, first 4 and last 4 characters.
    pub fn mask_key(&self, key: &str) -> String {
        let rest = key.strip_prefix(&self.prefix).unwrap_or(key);
        if rest.len() <= 8 || !rest.is_ascii() {
            return "*".repeat(key.chars().count());
        }
        let shown = if key.starts_with(&self.prefix) { self.prefix.as_str() } else { "" };
        format!("{}{}...{}", shown, &rest[..4], &rest[rest.len() - 4..])
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}
