use std::collections::HashMap;

use url::Url;

use crate::constants::{domains::POE_WEB, AUTH_REDIRECT, AUTH_REDIRECT_PARAM, AUTH_SESSION_ID};
use crate::errors::{invalid_credentials_error, CredentialField};
use crate::Error;

use self::types::{LoginCookie, NextStep, WebSessionParams};

// Utilities for the interactive login flow
pub mod types;

pub(crate) fn web_session_step() -> NextStep {
    let my_account = format!("{}/my-account", POE_WEB);
    let script = format!(
        r#"
            profileName = document.getElementsByClassName("name")[0].textContent;
            window.location.replace("{}" + profileName);
        "#,
        AUTH_REDIRECT
    );

    NextStep {
        next_step: "web_session".to_string(),
        auth_params: WebSessionParams {
            window_title: "Still sane, exile?".to_string(),
            window_width: 800,
            window_height: 600,
            start_uri: format!("{}/login", POE_WEB),
            end_uri_regex: format!("{}.*", regex::escape(AUTH_REDIRECT)),
        },
        js: HashMap::from_iter([(my_account, vec![script])]),
    }
}

pub(crate) fn session_id_from_cookies(cookies: &[LoginCookie]) -> Result<String, Error> {
    cookies
        .iter()
        .filter(|cookie| cookie.name == AUTH_SESSION_ID)
        .find_map(|cookie| cookie.value.clone().filter(|value| !value.is_empty()))
        .ok_or_else(|| invalid_credentials_error(CredentialField::SessionId))
}

/// The login window ends on `AUTH_REDIRECT` with the profile name appended
pub(crate) fn profile_name_from_end_uri(end_uri: Option<&str>) -> Result<String, Error> {
    let missing = || invalid_credentials_error(CredentialField::ProfileName);
    let end_uri = end_uri.ok_or_else(missing)?;
    if !end_uri.starts_with(AUTH_REDIRECT) {
        return Err(missing());
    }

    let url = Url::parse(end_uri).map_err(|_| missing())?;
    url.query_pairs()
        .find(|(key, _)| key == AUTH_REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(missing)
}
