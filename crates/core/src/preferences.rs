//! Small key-value blob persisted next to the data directory.
//!
//! Only two fixed keys are ever written: the welcome flag and the signed-in
//! user record. There is no schema version; unknown keys are preserved.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PreferencesError;

pub const WELCOME_SHOWN_KEY: &str = "taskMuse_welcomeShown";
pub const USER_KEY: &str = "taskMuse_user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl Preferences {
    /// Read the blob at `path`. A missing or unreadable file yields an empty blob.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring corrupt preferences");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read preferences");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let raw = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, raw).map_err(|source| self.io_error(source))
    }

    pub fn welcome_shown(&self) -> bool {
        match self.values.get(WELCOME_SHOWN_KEY) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(raw)) => raw == "true",
            _ => false,
        }
    }

    pub fn mark_welcome_shown(&mut self) -> Result<(), PreferencesError> {
        self.values
            .insert(WELCOME_SHOWN_KEY.to_string(), Value::Bool(true));
        self.save()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = self.values.get(USER_KEY)?;
        match serde_json::from_value(raw.clone()) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed user record");
                None
            }
        }
    }

    /// Mock sign-in: no credential check. The name defaults to the email's local part.
    pub fn login(
        &mut self,
        email: &str,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, PreferencesError> {
        let email = email.trim();
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email));
        let user = UserProfile {
            id: now.timestamp_millis().to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.values
            .insert(USER_KEY.to_string(), serde_json::to_value(&user)?);
        self.save()?;
        tracing::debug!(user_id = %user.id, "user signed in");
        Ok(user)
    }

    /// Returns whether a user was signed in.
    pub fn logout(&mut self) -> Result<bool, PreferencesError> {
        let removed = self.values.remove(USER_KEY).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    fn io_error(&self, source: io::Error) -> PreferencesError {
        PreferencesError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
