use std::collections::HashMap;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use crate::constants::{AUTH_PROFILE_NAME, AUTH_SESSION_ID};
use crate::errors::{invalid_credentials_error, CredentialField};
use crate::Error;

/// Session cookie value and the profile it belongs to
///
/// Immutable once built, a new session means a new value.
#[derive(Clone, Getters, PartialEq, Eq)]
pub struct Credentials {
    session_id: String,
    profile_name: String,
}

impl Credentials {
    pub fn new<S, P>(session_id: S, profile_name: P) -> Result<Self, Error>
    where
        S: Into<String>,
        P: Into<String>,
    {
        let session_id = session_id.into();
        let profile_name = profile_name.into();
        if session_id.is_empty() {
            return Err(invalid_credentials_error(CredentialField::SessionId));
        }
        if profile_name.is_empty() {
            return Err(invalid_credentials_error(CredentialField::ProfileName));
        }
        Ok(Self {
            session_id,
            profile_name,
        })
    }

    /// Both keys have to be present and non-empty
    pub fn from_stored(stored: &HashMap<String, String>) -> Option<Self> {
        let session_id = stored.get(AUTH_SESSION_ID)?;
        let profile_name = stored.get(AUTH_PROFILE_NAME)?;
        Self::new(session_id.as_str(), profile_name.as_str()).ok()
    }

    pub fn to_stored(&self) -> HashMap<String, String> {
        HashMap::from_iter([
            (AUTH_SESSION_ID.to_string(), self.session_id.clone()),
            (AUTH_PROFILE_NAME.to_string(), self.profile_name.clone()),
        ])
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.session_id.chars().take(4).collect();
        f.debug_struct("Credentials")
            .field("session_id", &format!("{}...", prefix))
            .field("profile_name", &self.profile_name)
            .finish()
    }
}

/// Cookie captured by the host's login window
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LoginCookie {
    pub name: String,
    pub value: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Authentication {
    pub user_id: String,
    pub user_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WebSessionParams {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub start_uri: String,
    pub end_uri_regex: String,
}

/// Instructs the host to open a login window before authentication can finish
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NextStep {
    pub next_step: String,
    pub auth_params: WebSessionParams,
    pub js: HashMap<String, Vec<String>>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum AuthResponse {
    Authenticated(Authentication),
    NextStep(NextStep),
}
