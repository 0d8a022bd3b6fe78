use thiserror::Error;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The password does not meet the policy.
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Password hashing failed.
    #[error("Failed to hash password")]
    Hash,

    /// The email/password pair did not match a stored credential.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// A token could not be created.
    #[error("Failed to create token")]
    TokenCreation,

    /// The token's expiry has passed.
    #[error("Token expired")]
    TokenExpired,

    /// The token is malformed, has a bad signature, or carries an
    /// unusable subject.
    #[error("Invalid token")]
    TokenInvalid,
}
