//! Authentication service.
//!
//! Customers sign in with their email and password. The customer store is
//! reached through the [`IdentityProvider`] trait, which maps a stored
//! customer to the [`Identity`] shape the login flow works with.

mod error;

pub use error::AuthError;

use std::future::Future;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use nighthawk_core::Email;

/// An authenticatable principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Login name (the customer's email).
    pub username: Email,
    /// Stored Argon2 password hash.
    pub credential: String,
    /// One authority per product attached to the customer.
    pub authorities: Vec<String>,
}

/// Source of identities for the login flow.
pub trait IdentityProvider {
    /// Load the identity registered under `username`.
    ///
    /// Fails with [`AuthError::UserNotFound`] when nothing matches.
    fn load_identity(
        &self,
        username: &Email,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;
}

/// Password authentication on top of an [`IdentityProvider`].
pub struct AuthService<P> {
    provider: P,
}

impl<P: IdentityProvider> AuthService<P> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Verify an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserNotFound` if no customer has that email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong or unset.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;
        let identity = self.provider.load_identity(&email).await?;

        if password.is_empty() || identity.credential.trim().is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        verify_password(password, &identity.credential)?;

        Ok(identity)
    }
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the hash is malformed or doesn't match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct StaticProvider(HashMap<String, Identity>);

    impl IdentityProvider for StaticProvider {
        async fn load_identity(&self, username: &Email) -> Result<Identity, AuthError> {
            self.0
                .get(username.as_str())
                .cloned()
                .ok_or_else(|| AuthError::UserNotFound(username.to_string()))
        }
    }

    fn provider_with(email: &str, credential: &str) -> StaticProvider {
        let identity = Identity {
            username: Email::parse(email).unwrap(),
            credential: credential.to_string(),
            authorities: vec!["ROLE_USER".to_string()],
        };
        StaticProvider(HashMap::from([(email.to_string(), identity)]))
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let first = hash_password("123Toby!").unwrap();
        let second = hash_password("123Toby!").unwrap();

        assert_ne!(first, "123Toby!");
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("123Toby!", &first).is_ok());
        assert!(matches!(
            verify_password("wrong", &first),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let hash = hash_password("123Niko!").unwrap();
        let auth = AuthService::new(provider_with("niko@gmail.com", &hash));

        let identity = auth.authenticate("niko@gmail.com", "123Niko!").await.unwrap();
        assert_eq!(identity.username.as_str(), "niko@gmail.com");
        assert_eq!(identity.authorities, vec!["ROLE_USER"]);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let auth = AuthService::new(provider_with("niko@gmail.com", "x"));
        let err = auth.authenticate("lexb@gmail.com", "pw").await.unwrap_err();

        assert!(matches!(err, AuthError::UserNotFound(ref who) if who == "lexb@gmail.com"));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_empty_password_even_if_hash_matches() {
        let hash = hash_password("").unwrap();
        let auth = AuthService::new(provider_with("madam@gmail.com", &hash));
        let err = auth.authenticate("madam@gmail.com", "").await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_blank_credential() {
        let auth = AuthService::new(provider_with("niko@gmail.com", ""));
        let err = auth.authenticate("niko@gmail.com", "").await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
