use crate::error::AuthError;

/// Claims carried by a validated bearer token. The identity provider in
/// front of the admin console issues these; we only read the principal's
/// email and check it against the allow-list.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub email: String,
    pub exp: i64,
}

/// Token issuing and validation.
pub trait TokenService: Send + Sync {
    fn generate_token(&self, email: &str) -> Result<String, AuthError>;

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
