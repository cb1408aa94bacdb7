use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use exam_core::model::UserId;

use crate::error::AuthError;

/// Signed-in identity as exposed to the rest of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    user_id: UserId,
    display_name: String,
}

impl UserProfile {
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

#[derive(Debug, Clone)]
struct StoredUser {
    display_name: String,
    password: String,
}

/// In-memory identity gate.
///
/// The exam core treats identity purely as a gate: results are stamped
/// with the signed-in user's id, falling back to a placeholder when nobody
/// is signed in. Accounts live only for the process lifetime.
#[derive(Debug, Default)]
pub struct AuthService {
    users: Mutex<HashMap<String, StoredUser>>,
    current: Mutex<Option<UserProfile>>,
}

impl AuthService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateUser` if the name is taken.
    pub fn register(
        &self,
        username: &str,
        display_name: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let mut users = lock(&self.users);
        if users.contains_key(username) {
            return Err(AuthError::DuplicateUser(username.to_owned()));
        }
        users.insert(
            username.to_owned(),
            StoredUser {
                display_name: display_name.to_owned(),
                password: password.to_owned(),
            },
        );
        drop(users);

        self.login(username, password)
    }

    /// Sign a user in, replacing whoever was signed in before.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownUser` or `AuthError::InvalidCredentials`.
    pub fn login(&self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        let users = lock(&self.users);
        let stored = users.get(username).ok_or(AuthError::UnknownUser)?;
        if stored.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = UserProfile {
            user_id: UserId::new(username),
            display_name: stored.display_name.clone(),
        };
        drop(users);

        *lock(&self.current) = Some(profile.clone());
        tracing::debug!(user = username, "user signed in");
        Ok(profile)
    }

    pub fn logout(&self) {
        if lock(&self.current).take().is_some() {
            tracing::debug!("user signed out");
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        lock(&self.current).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_signs_the_user_in() {
        let auth = AuthService::new();
        let profile = auth.register("asha", "Asha", "pw").unwrap();

        assert_eq!(profile.display_name(), "Asha");
        assert_eq!(auth.current_user(), Some(profile));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let auth = AuthService::new();
        auth.register("asha", "Asha", "pw").unwrap();
        let err = auth.register("asha", "Other", "pw2").unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser(name) if name == "asha"));
    }

    #[test]
    fn login_checks_credentials() {
        let auth = AuthService::new();
        auth.register("asha", "Asha", "pw").unwrap();
        auth.logout();

        assert_eq!(
            auth.login("asha", "wrong").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(auth.login("nobody", "pw").unwrap_err(), AuthError::UnknownUser);
        assert!(auth.login("asha", "pw").is_ok());
    }

    #[test]
    fn logout_clears_the_current_user() {
        let auth = AuthService::new();
        auth.register("asha", "Asha", "pw").unwrap();
        auth.logout();
        assert_eq!(auth.current_user(), None);
    }
}
