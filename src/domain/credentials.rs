//! In-memory login credentials.

use crate::domain::error::ShellError;

/// A username/password pair, both non-empty by construction. Held only
/// by the active exchange adapter, never persisted, and replaced or
/// dropped solely through the login/logout commands.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ShellError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(ShellError::Command("Empty username.".to_string()));
        }
        if password.is_empty() {
            return Err(ShellError::Command("Empty password.".to_string()));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Keep the password out of debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_credentials() {
        let creds = Credentials::new("alice", "hunter2").unwrap();
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), "hunter2");
    }

    #[test]
    fn empty_username_rejected() {
        let err = Credentials::new("", "hunter2").unwrap_err();
        assert_eq!(err.to_string(), "Empty username.");
    }

    #[test]
    fn empty_password_rejected() {
        let err = Credentials::new("alice", "").unwrap_err();
        assert_eq!(err.to_string(), "Empty password.");
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2").unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
