//! Publish/signing property propagation for multi-module builds.
//!
//! An optional, uncommitted `publish.properties` file at the root holds
//! upload credentials and signing settings. [`propagate`] reads it once,
//! anchors `signing.secretKeyRingFile` at the root directory, and writes the
//! same key/value set into every module's [`ExtraProperties`]. The
//! [`VariantGate`] leaves only the release variant enabled.
//!
//! ```no_run
//! use publish_props_core::{ModuleScope, PropagationConfig, propagate};
//! use std::path::Path;
//!
//! let config = PropagationConfig::load(Path::new(".")).unwrap();
//! let mut scope = ModuleScope::discover(config.root_dir()).unwrap();
//! propagate(&config, scope.modules_mut()).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod extra;
pub mod inject;
pub mod module;
pub mod properties;
pub mod propagate;
pub mod publishing;
pub mod resolver;
pub mod variant;

pub use config::{PropagationConfig, PublishPropsConfig, SIGNING_KEY_RING_FILE};
pub use error::{Error, Result};
pub use extra::ExtraProperties;
pub use inject::{ExtensionAware, PropertyInjector};
pub use module::{Module, ModuleScope};
pub use properties::{PropertyFile, PropertySource};
pub use propagate::{PropagationReport, propagate};
pub use publishing::{CentralPortalCredentials, PublishingType, SigningConfig};
pub use resolver::PathResolver;
pub use variant::{BuildVariant, VariantGate, VariantState};
