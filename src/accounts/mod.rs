use std::collections::HashMap;
use thiserror::Error;

use crate::storage::{Storage, StorageError};

/// Storage key holding the username -> password map.
pub const USERS_KEY: &str = "users";
/// Session flag keys consumed by the login UI.
pub const LOGGED_IN_KEY: &str = "loggedIn";
pub const USER_KEY: &str = "user";

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Please enter username and password")]
    MissingCredentials,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password should be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("No account found with that username")]
    UnknownUser,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Toy username/password registry, persisted as a plaintext JSON object
/// under the `users` key.
///
/// This mirrors the shipped app's login gate and is NOT a security
/// boundary: passwords are stored verbatim and compared with string
/// equality. Anything needing real authentication should delegate to an
/// actual identity service instead of this registry.
pub struct AccountRegistry {
    storage: Storage,
}

impl AccountRegistry {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Register a new account and log it in.
    pub fn sign_up(&self, username: &str, password: &str, confirm: &str) -> AuthResult<()> {
        if username.is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }

        let mut users = self.load_users();
        if users.contains_key(username) {
            return Err(AuthError::UsernameTaken);
        }

        users.insert(username.to_string(), password.to_string());
        self.save_users(&users)?;
        self.set_session(username)?;
        log::info!("Registered account '{}'", username);
        Ok(())
    }

    /// Log in with the given credentials.
    ///
    /// An empty registry keeps the original demo behavior: any non-empty
    /// credentials are accepted.
    pub fn log_in(&self, username: &str, password: &str) -> AuthResult<()> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let users = self.load_users();
        if users.is_empty() {
            self.set_session(username)?;
            return Ok(());
        }

        match users.get(username) {
            None => Err(AuthError::UnknownUser),
            Some(stored) if stored != password => Err(AuthError::WrongPassword),
            Some(_) => {
                self.set_session(username)?;
                Ok(())
            }
        }
    }

    /// Clear the session flags.
    pub fn log_out(&self) -> AuthResult<()> {
        self.storage.remove(LOGGED_IN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }

    /// Username of the logged-in user, if any.
    pub fn current_user(&self) -> Option<String> {
        let logged_in = self
            .storage
            .get(LOGGED_IN_KEY)
            .ok()
            .flatten()
            .map(|v| v == "true")
            .unwrap_or(false);
        if !logged_in {
            return None;
        }
        self.storage.get(USER_KEY).ok().flatten()
    }

    fn set_session(&self, username: &str) -> AuthResult<()> {
        self.storage.put(LOGGED_IN_KEY, "true")?;
        self.storage.put(USER_KEY, username)?;
        Ok(())
    }

    /// Malformed or absent registry state falls back to an empty map.
    fn load_users(&self) -> HashMap<String, String> {
        match self.storage.get(USERS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            _ => HashMap::new(),
        }
    }

    fn save_users(&self, users: &HashMap<String, String>) -> AuthResult<()> {
        let json = serde_json::to_string(users).unwrap_or_else(|_| "{}".to_string());
        self.storage.put(USERS_KEY, &json)?;
        Ok(())
    }
}
