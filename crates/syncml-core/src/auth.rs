//! Enrollment authentication against previously issued tokens.
//!
//! Tokens are not invalidated on use; a device may present the same token on
//! every first-contact attempt.

use thiserror::Error;
use tracing::debug;

use crate::services::TokenCache;

/// Reason a first-contact message was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("no credential in header")]
    MissingCredential,

    #[error("no claimed user in header")]
    MissingUser,

    #[error("token not found in cache")]
    UnknownToken,

    #[error("token issued to '{expected}', presented by '{claimed}'")]
    UserMismatch { expected: String, claimed: String },
}

pub struct EnrollmentAuthenticator<'a, C: TokenCache + ?Sized> {
    cache: &'a C,
}

impl<'a, C: TokenCache + ?Sized> EnrollmentAuthenticator<'a, C> {
    pub fn new(cache: &'a C) -> Self {
        Self { cache }
    }

    /// Succeeds iff the cached username for `token` equals `claimed_user` exactly.
    pub fn verify(
        &self,
        token: Option<&str>,
        claimed_user: Option<&str>,
    ) -> Result<(), AuthFailure> {
        let token = token.ok_or(AuthFailure::MissingCredential)?;
        let claimed_user = claimed_user.ok_or(AuthFailure::MissingUser)?;
        let entry = self.cache.lookup(token).ok_or(AuthFailure::UnknownToken)?;
        if entry.username != claimed_user {
            return Err(AuthFailure::UserMismatch {
                expected: entry.username,
                claimed: claimed_user.to_string(),
            });
        }
        debug!(user = %claimed_user, "Enrollment token accepted");
        Ok(())
    }

    pub fn authenticate(&self, token: Option<&str>, claimed_user: Option<&str>) -> bool {
        self.verify(token, claimed_user).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryTokenCache;

    fn cache() -> InMemoryTokenCache {
        let cache = InMemoryTokenCache::new();
        cache.insert("T1", "alice");
        cache
    }

    #[test]
    fn test_matching_user() {
        let cache = cache();
        let auth = EnrollmentAuthenticator::new(&cache);
        assert!(auth.authenticate(Some("T1"), Some("alice")));
        // Reuse is allowed.
        assert!(auth.authenticate(Some("T1"), Some("alice")));
    }

    #[test]
    fn test_cache_miss_is_failure() {
        let cache = cache();
        let auth = EnrollmentAuthenticator::new(&cache);
        assert_eq!(auth.verify(Some("T9"), Some("alice")), Err(AuthFailure::UnknownToken));
        assert_eq!(auth.verify(None, Some("alice")), Err(AuthFailure::MissingCredential));
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let cache = cache();
        let auth = EnrollmentAuthenticator::new(&cache);
        assert_eq!(
            auth.verify(Some("T1"), Some("Alice")),
            Err(AuthFailure::UserMismatch {
                expected: "alice".to_string(),
                claimed: "Alice".to_string(),
            })
        );
        assert!(!auth.authenticate(Some("T1"), Some("")));
    }

    #[test]
    fn test_absent_user_never_matches() {
        let cache = cache();
        cache.insert("T0", "");
        let auth = EnrollmentAuthenticator::new(&cache);
        assert_eq!(auth.verify(Some("T0"), None), Err(AuthFailure::MissingUser));
        assert!(auth.authenticate(Some("T0"), Some("")));
    }
}
