use thiserror::Error;

/// Rejections produced by the API key gate. Each maps to one HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("API key required.")]
    Unauthorized,

    #[error("Invalid API key.")]
    Forbidden,

    #[error("Rate limit exceeded. Try again in {retry_after_minutes} minute(s).")]
    RateLimited {
        retry_after_minutes: u64,
        retry_after_seconds: u64,
    },
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Unauthorized => 401,
            AuthError::Forbidden => 403,
            AuthError::RateLimited { .. } => 429,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}
