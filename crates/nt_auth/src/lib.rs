pub mod error;
pub mod gate;
pub mod generator;
pub mod limiter;
pub mod registry;

pub use error::AuthError;
pub use gate::{AuthContext, AuthGate, Outcome};
pub use generator::ApiKeyGenerator;
pub use limiter::{RateDecision, RateLimiter};
pub use registry::{ApiKeyRecord, KeyRegistry};

/// Settings for the API key gate. Environment handling lives in the binary.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub require_api_key: bool,
    pub api_keys: Vec<String>,
    pub production: bool,
}

impl AuthConfig {
    /// Builds a registry from the configured keys and wraps it in a gate.
    /// The generated development key, if any, is returned alongside.
    pub async fn build_gate(&self) -> (AuthGate, Option<String>) {
        let registry = KeyRegistry::new();
        let dev_key = registry.bootstrap(&self.api_keys, self.production).await;
        (AuthGate::new(registry, self.require_api_key), dev_key)
    }
}

pub mod prelude {
    pub use super::{AuthConfig, AuthError, AuthGate, KeyRegistry, Outcome};
}
