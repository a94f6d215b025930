//! Authentication port.
//!
//! Identity is owned by an external issuer; this service only checks bearer
//! tokens and reads the subject out of them.

/// Claims carried by a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Identifier of the authenticated caller.
    pub subject: String,
    pub exp: i64,
}

/// Token service trait for bearer token operations.
pub trait TokenService: Send + Sync {
    /// Issue an access token for `subject`.
    fn generate_token(&self, subject: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
