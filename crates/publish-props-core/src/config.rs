use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the optional settings file looked up in the root directory.
pub const CONFIG_FILE_NAME: &str = "publish-props.toml";

/// The one key whose value is rewritten into an absolute path before injection.
pub const SIGNING_KEY_RING_FILE: &str = "signing.secretKeyRingFile";

/// publish-props.toml settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishPropsConfig {
    #[serde(default)]
    pub propagation: PropagationSettings,
    #[serde(default)]
    pub variants: VariantSettings,
    #[serde(default)]
    pub publishing: PublishingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationSettings {
    /// Property file, relative to the root directory
    #[serde(default = "default_property_file")]
    pub property_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSettings {
    /// The only variant left enabled
    #[serde(default = "default_release_variant")]
    pub release: String,
    /// Variants declared by the packaging module
    #[serde(default = "default_declared_variants")]
    pub declared: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishingSettings {
    /// How uploaded deployments are released on the portal
    #[serde(default)]
    pub publishing_type: crate::publishing::PublishingType,
}

impl Default for PropagationSettings {
    fn default() -> Self {
        Self {
            property_file: default_property_file(),
        }
    }
}

impl Default for VariantSettings {
    fn default() -> Self {
        Self {
            release: default_release_variant(),
            declared: default_declared_variants(),
        }
    }
}

impl PublishPropsConfig {
    /// Load from publish-props.toml in `root_dir`, or return defaults if not found.
    pub fn load(root_dir: &Path) -> crate::Result<Self> {
        let config_path = root_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

/// Everything one propagation pass needs, built once and passed by reference.
///
/// The root directory is made absolute on construction and never changes
/// afterwards; it anchors both the property file lookup and the resolution
/// of [`SIGNING_KEY_RING_FILE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationConfig {
    root_dir: PathBuf,
    property_file: PathBuf,
}

impl PropagationConfig {
    /// Build a config with default settings rooted at `root_dir`.
    ///
    /// # Errors
    ///
    /// [`Error::RootResolve`](crate::Error::RootResolve) if a relative root
    /// cannot be made absolute (e.g. the current directory is gone).
    pub fn new(root_dir: impl AsRef<Path>) -> crate::Result<Self> {
        Self::from_settings(root_dir, &PropagationSettings::default())
    }

    pub fn from_settings(
        root_dir: impl AsRef<Path>,
        settings: &PropagationSettings,
    ) -> crate::Result<Self> {
        let root_dir = root_dir.as_ref();
        let root_dir = std::path::absolute(root_dir).map_err(|e| crate::Error::RootResolve {
            path: root_dir.to_path_buf(),
            source: e,
        })?;

        Ok(Self {
            root_dir,
            property_file: PathBuf::from(&settings.property_file),
        })
    }

    /// Read publish-props.toml under `root_dir` and build the config from it.
    pub fn load(root_dir: impl AsRef<Path>) -> crate::Result<Self> {
        let settings = PublishPropsConfig::load(root_dir.as_ref())?;
        Self::from_settings(root_dir, &settings.propagation)
    }

    pub fn with_property_file(mut self, property_file: impl Into<PathBuf>) -> Self {
        self.property_file = property_file.into();
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Absolute location of the property file.
    pub fn property_file_path(&self) -> PathBuf {
        self.root_dir.join(&self.property_file)
    }
}

fn default_property_file() -> String {
    "publish.properties".to_owned()
}

fn default_release_variant() -> String {
    "release".to_owned()
}

fn default_declared_variants() -> Vec<String> {
    vec!["debug".to_owned(), "release".to_owned()]
}
