use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::limiter::RateDecision;
use crate::registry::{ApiKeyRecord, KeyRegistry};

/// Result of presenting a key to the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `None` when the gate is disabled.
    Authenticated(Option<AuthContext>),
    Unauthorized,
    Forbidden,
    RateLimited {
        retry_after_minutes: u64,
        retry_after_seconds: u64,
    },
}

/// What downstream handlers get to see about an admitted key.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub record: ApiKeyRecord,
    pub decision: RateDecision,
}

impl Outcome {
    pub fn into_result(self) -> Result<Option<AuthContext>, AuthError> {
        match self {
            Outcome::Authenticated(context) => Ok(context),
            Outcome::Unauthorized => Err(AuthError::Unauthorized),
            Outcome::Forbidden => Err(AuthError::Forbidden),
            Outcome::RateLimited {
                retry_after_minutes,
                retry_after_seconds,
            } => Err(AuthError::RateLimited {
                retry_after_minutes,
                retry_after_seconds,
            }),
        }
    }
}

/// Route-agnostic API key check. Knows nothing about HTTP beyond the status
/// codes carried by [`AuthError`].
#[derive(Debug, Clone)]
pub struct AuthGate {
    registry: KeyRegistry,
    require_api_key: bool,
}

impl AuthGate {
    pub fn new(registry: KeyRegistry, require_api_key: bool) -> Self {
        Self {
            registry,
            require_api_key,
        }
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    pub fn is_enabled(&self) -> bool {
        self.require_api_key
    }

    pub async fn authenticate(&self, provided_key: Option<&str>) -> Outcome {
        self.authenticate_at(provided_key, Utc::now()).await
    }

    pub async fn authenticate_at(&self, provided_key: Option<&str>, now: DateTime<Utc>) -> Outcome {
        if !self.require_api_key {
            return Outcome::Authenticated(None);
        }

        let key = match provided_key.map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => return Outcome::Unauthorized,
        };

        let Some((decision, record)) = self.registry.admit(key, now).await else {
            debug!(key = %self.registry.generator().mask_key(key), "Rejected unknown API key");
            return Outcome::Forbidden;
        };

        if !decision.allowed {
            warn!(
                name = %record.name,
                limit = decision.limit,
                retry_after_minutes = decision.retry_after_minutes,
                "Rate limit exceeded"
            );
            return Outcome::RateLimited {
                retry_after_minutes: decision.retry_after_minutes,
                retry_after_seconds: decision.retry_after_seconds,
            };
        }

        Outcome::Authenticated(Some(AuthContext { record, decision }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn gate_with_key(limit: u32) -> (AuthGate, String) {
        let registry = KeyRegistry::new();
        let key = registry.issue_with_limit("test", limit).await.unwrap();
        (AuthGate::new(registry, true), key)
    }

    #[tokio::test]
    async fn test_missing_key_is_unauthorized() {
        let (gate, _) = gate_with_key(5).await;
        assert_eq!(gate.authenticate(None).await, Outcome::Unauthorized);
        assert_eq!(gate.authenticate(Some("")).await, Outcome::Unauthorized);
        assert_eq!(gate.authenticate(Some("  ")).await, Outcome::Unauthorized);
    }

    #[tokio::test]
    async fn test_unknown_key_is_forbidden() {
        let (gate, _) = gate_with_key(5).await;
        assert_eq!(gate.authenticate(Some("nt_bogus")).await, Outcome::Forbidden);
    }

    #[tokio::test]
    async fn test_limit_then_rate_limited() {
        let (gate, key) = gate_with_key(2).await;
        let now = Utc::now() + Duration::seconds(5);

        for _ in 0..2 {
            match gate.authenticate_at(Some(&key), now).await {
                Outcome::Authenticated(Some(context)) => assert_eq!(context.record.name, "test"),
                other => panic!("expected admission, got {:?}", other),
            }
        }

        let err = gate
            .authenticate_at(Some(&key), now)
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(err.status_code(), 429);
        match err {
            AuthError::RateLimited {
                retry_after_minutes,
                retry_after_seconds,
            } => {
                assert!(retry_after_minutes > 0);
                assert!(retry_after_seconds > 0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disabled_gate_admits_everything() {
        let gate = AuthGate::new(KeyRegistry::new(), false);
        assert_eq!(gate.authenticate(None).await, Outcome::Authenticated(None));
        assert_eq!(
            gate.authenticate(Some("whatever")).await,
            Outcome::Authenticated(None)
        );
    }

    #[test]
    fn test_error_statuses_and_messages() {
        assert_eq!(AuthError::Unauthorized.status_code(), 401);
        assert_eq!(AuthError::Unauthorized.message(), "API key required.");
        assert_eq!(AuthError::Forbidden.status_code(), 403);
        assert_eq!(AuthError::Forbidden.message(), "Invalid API key.");
        let limited = AuthError::RateLimited {
            retry_after_minutes: 12,
            retry_after_seconds: 700,
        };
        assert!(limited.message().contains("12"));
    }
}
