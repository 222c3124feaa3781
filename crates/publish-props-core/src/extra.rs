//! Per-module extended property namespace.
//!
//! Keys that publishing and signing read are exposed as typed fields;
//! everything else lands in a plain string map so unknown keys still flow
//! through to whatever consumer asks for them by name.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::config::SIGNING_KEY_RING_FILE;

pub const CENTRAL_PORTAL_USERNAME: &str = "centralPortalUsername";
pub const CENTRAL_PORTAL_PASSWORD: &str = "centralPortalPassword";
pub const SIGNING_KEY_ID: &str = "signing.keyId";
pub const SIGNING_PASSWORD: &str = "signing.password";

const REDACTED: &str = "[REDACTED]";

/// String-keyed properties attached to one module.
///
/// Writes overwrite. Nothing is ever removed. Passwords are held as
/// [`SecretString`] and are redacted in `Debug` output and in
/// [`redacted`](Self::redacted).
#[derive(Clone, Default)]
pub struct ExtraProperties {
    central_portal_username: Option<String>,
    central_portal_password: Option<SecretString>,
    signing_key_id: Option<String>,
    signing_password: Option<SecretString>,
    signing_key_ring_file: Option<String>,
    other: BTreeMap<String, String>,
}

impl ExtraProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: &str) {
        match key {
            CENTRAL_PORTAL_USERNAME => self.central_portal_username = Some(value.to_owned()),
            CENTRAL_PORTAL_PASSWORD => {
                self.central_portal_password = Some(SecretString::from(value.to_owned()));
            }
            SIGNING_KEY_ID => self.signing_key_id = Some(value.to_owned()),
            SIGNING_PASSWORD => self.signing_password = Some(SecretString::from(value.to_owned())),
            SIGNING_KEY_RING_FILE => self.signing_key_ring_file = Some(value.to_owned()),
            _ => {
                self.other.insert(key.to_owned(), value.to_owned());
            }
        }
    }

    /// Look a value up by exact key. Secrets are exposed: the caller asked for them.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            CENTRAL_PORTAL_USERNAME => self.central_portal_username.as_deref(),
            CENTRAL_PORTAL_PASSWORD => self
                .central_portal_password
                .as_ref()
                .map(|s| s.expose_secret()),
            SIGNING_KEY_ID => self.signing_key_id.as_deref(),
            SIGNING_PASSWORD => self.signing_password.as_ref().map(|s| s.expose_secret()),
            SIGNING_KEY_RING_FILE => self.signing_key_ring_file.as_deref(),
            _ => self.other.get(key).map(String::as_str),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn central_portal_username(&self) -> Option<&str> {
        self.central_portal_username.as_deref()
    }

    pub fn central_portal_password(&self) -> Option<&SecretString> {
        self.central_portal_password.as_ref()
    }

    pub fn signing_key_id(&self) -> Option<&str> {
        self.signing_key_id.as_deref()
    }

    pub fn signing_password(&self) -> Option<&SecretString> {
        self.signing_password.as_ref()
    }

    pub fn signing_key_ring_file(&self) -> Option<&Path> {
        self.signing_key_ring_file.as_deref().map(Path::new)
    }

    /// Every key/value pair, sorted by key, secrets exposed.
    pub fn entries(&self) -> BTreeMap<&str, &str> {
        let known = [
            CENTRAL_PORTAL_USERNAME,
            CENTRAL_PORTAL_PASSWORD,
            SIGNING_KEY_ID,
            SIGNING_PASSWORD,
            SIGNING_KEY_RING_FILE,
        ];
        known
            .into_iter()
            .filter_map(|k| self.get(k).map(|v| (k, v)))
            .chain(self.other.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }

    /// Every key/value pair with sensitive values masked, for display.
    pub fn redacted(&self) -> BTreeMap<String, String> {
        self.entries()
            .into_iter()
            .map(|(k, v)| {
                let shown = if is_sensitive_key(k) { REDACTED } else { v };
                (k.to_owned(), shown.to_owned())
            })
            .collect()
    }
}

/// Whether a key's value must not be shown. Unknown keys are judged by name.
pub fn is_sensitive_key(key: &str) -> bool {
    match key {
        CENTRAL_PORTAL_PASSWORD | SIGNING_PASSWORD => true,
        CENTRAL_PORTAL_USERNAME | SIGNING_KEY_ID | SIGNING_KEY_RING_FILE => false,
        _ => {
            let key = key.to_ascii_lowercase();
            ["password", "secret", "token"]
                .iter()
                .any(|marker| key.contains(marker))
        }
    }
}

impl PartialEq for ExtraProperties {
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

impl Eq for ExtraProperties {}

impl fmt::Debug for ExtraProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.redacted()).finish()
    }
}
