//! Read-side views over a module's extra properties.
//!
//! These are what the upload and signing steps consume. A missing key means
//! the capability is unconfigured, so every constructor returns `Option`.

use std::fmt;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::extra::ExtraProperties;

pub const CENTRAL_PORTAL_USERNAME_ENV: &str = "CENTRAL_PORTAL_USERNAME";
pub const CENTRAL_PORTAL_PASSWORD_ENV: &str = "CENTRAL_PORTAL_PASSWORD";

/// How an uploaded deployment gets released on the portal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishingType {
    /// Uploaded, validated, then released by hand
    #[default]
    UserManaged,
    /// Released as soon as validation passes
    Automatic,
}

impl fmt::Display for PublishingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserManaged => "USER_MANAGED",
            Self::Automatic => "AUTOMATIC",
        })
    }
}

/// Upload service credentials.
#[derive(Clone)]
pub struct CentralPortalCredentials {
    pub username: String,
    pub password: SecretString,
}

impl fmt::Debug for CentralPortalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CentralPortalCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl CentralPortalCredentials {
    /// Credentials from the namespace, falling back to the process environment.
    pub fn from_extra(extra: &ExtraProperties) -> Option<Self> {
        Self::resolve(extra, |key| {
            // arch-lint: allow(no-silent-result-drop) reason="an unset variable means the credential is not configured"
            std::env::var(key).ok()
        })
    }

    /// Each value comes from the namespace first, then from `env`. Both must
    /// be found, otherwise uploading is unconfigured.
    pub fn resolve<F>(extra: &ExtraProperties, env: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = extra
            .central_portal_username()
            .map(str::to_owned)
            .or_else(|| env(CENTRAL_PORTAL_USERNAME_ENV));
        let password = extra
            .central_portal_password()
            .map(|p| p.expose_secret().to_owned())
            .or_else(|| env(CENTRAL_PORTAL_PASSWORD_ENV));

        match (username, password) {
            (Some(username), Some(password)) => Some(Self {
                username,
                password: SecretString::from(password),
            }),
            _ => None,
        }
    }
}

/// Inputs of the signing step.
#[derive(Clone)]
pub struct SigningConfig {
    pub key_id: String,
    pub password: SecretString,
    /// Absolute once propagated; may not exist
    pub key_ring_file: PathBuf,
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("key_id", &self.key_id)
            .field("password", &"[REDACTED]")
            .field("key_ring_file", &self.key_ring_file)
            .finish()
    }
}

impl SigningConfig {
    /// Signing is configured only when key id, password and key ring are all set.
    pub fn from_extra(extra: &ExtraProperties) -> Option<Self> {
        Some(Self {
            key_id: extra.signing_key_id()?.to_owned(),
            password: extra.signing_password()?.clone(),
            key_ring_file: extra.signing_key_ring_file()?.to_path_buf(),
        })
    }

    /// Names of the signing keys that are not set.
    pub fn missing_keys(extra: &ExtraProperties) -> Vec<&'static str> {
        [
            crate::extra::SIGNING_KEY_ID,
            crate::extra::SIGNING_PASSWORD,
            crate::config::SIGNING_KEY_RING_FILE,
        ]
        .into_iter()
        .filter(|k| !extra.contains(k))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SIGNING_KEY_RING_FILE;
    use crate::extra::{CENTRAL_PORTAL_PASSWORD, CENTRAL_PORTAL_USERNAME, SIGNING_KEY_ID, SIGNING_PASSWORD};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn credentials_from_properties() {
        let mut extra = ExtraProperties::new();
        extra.set(CENTRAL_PORTAL_USERNAME, "alice");
        extra.set(CENTRAL_PORTAL_PASSWORD, "pw");

        let creds = CentralPortalCredentials::resolve(&extra, no_env).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password.expose_secret(), "pw");
    }

    #[test]
    fn credentials_fall_back_to_env_per_value() {
        let mut extra = ExtraProperties::new();
        extra.set(CENTRAL_PORTAL_USERNAME, "alice");

        let creds = CentralPortalCredentials::resolve(&extra, |k| {
            (k == CENTRAL_PORTAL_PASSWORD_ENV).then(|| "from-env".to_owned())
        })
        .unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password.expose_secret(), "from-env");
    }

    #[test]
    fn properties_win_over_env() {
        let mut extra = ExtraProperties::new();
        extra.set(CENTRAL_PORTAL_USERNAME, "alice");
        extra.set(CENTRAL_PORTAL_PASSWORD, "pw");

        let creds =
            CentralPortalCredentials::resolve(&extra, |_| Some("env".to_owned())).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password.expose_secret(), "pw");
    }

    #[test]
    fn half_configured_credentials_are_unconfigured() {
        let mut extra = ExtraProperties::new();
        extra.set(CENTRAL_PORTAL_USERNAME, "alice");
        assert!(CentralPortalCredentials::resolve(&extra, no_env).is_none());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = CentralPortalCredentials {
            username: "alice".to_owned(),
            password: SecretString::from("pw-value".to_owned()),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("pw-value"));
        assert!(debug.contains("alice"));
    }

    #[test]
    fn signing_needs_all_three_keys() {
        let mut extra = ExtraProperties::new();
        extra.set(SIGNING_KEY_ID, "ABCD1234");
        extra.set(SIGNING_PASSWORD, "pw");
        assert!(SigningConfig::from_extra(&extra).is_none());
        assert_eq!(
            SigningConfig::missing_keys(&extra),
            vec![SIGNING_KEY_RING_FILE]
        );

        extra.set(SIGNING_KEY_RING_FILE, "/proj/keys/secring.gpg");
        let signing = SigningConfig::from_extra(&extra).unwrap();
        assert_eq!(signing.key_id, "ABCD1234");
        assert_eq!(signing.key_ring_file, PathBuf::from("/proj/keys/secring.gpg"));
        assert!(SigningConfig::missing_keys(&extra).is_empty());
    }

    #[test]
    fn publishing_type_wire_names() {
        assert_eq!(PublishingType::default().to_string(), "USER_MANAGED");
        assert_eq!(PublishingType::Automatic.to_string(), "AUTOMATIC");
    }
}
