//! Registration and credential checks.

use auth::password;
use store::{DocumentStore, StoreError, User};

use crate::{DomainError, Email};

/// Service for user accounts.
///
/// Registration validates the email and password, hashes the password
/// and inserts the user; the store's unique-email constraint is the
/// authority on duplicates. Authentication resolves an email/password
/// pair to a stored user without revealing which half was wrong.
pub struct AccountService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> AccountService<S> {
    /// Creates a new account service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new user.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let email = Email::parse(email)?;
        password::validate_password(password)?;
        let password_hash = password::hash_password(password)?;

        let user = User::new(full_name, email.into_inner(), password_hash);
        let created = user.clone();

        self.store.insert_user(user).await.map_err(|e| match e {
            StoreError::DuplicateKey { .. } => DomainError::DuplicateEmail,
            other => DomainError::Store(other),
        })?;

        tracing::info!(user_id = %created.id, "user registered");
        Ok(created)
    }

    /// Checks an email/password pair and returns the matching user.
    ///
    /// Unknown emails, malformed emails and wrong passwords all fail
    /// with `InvalidCredentials`.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = Email::parse(email).map_err(|_| DomainError::InvalidCredentials)?;

        let user = self
            .store
            .find_user_by_email(email.as_str())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        password::verify_password(password, &user.password_hash)?;

        Ok(user)
    }
}
