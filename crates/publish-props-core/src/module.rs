//! Build modules and the scope that receives propagated properties.
//!
//! A scope is one root module (path `:`) plus its sub-modules (`:name`).
//! It is either declared directly or discovered from a Cargo workspace via
//! `cargo metadata --no-deps`.

use std::path::{Path, PathBuf};

use cargo_metadata::MetadataCommand;

use crate::extra::ExtraProperties;
use crate::inject::ExtensionAware;

/// Path of the root module.
pub const ROOT_MODULE_PATH: &str = ":";

/// One module of the build graph and its extended property namespace.
///
/// # Examples
///
/// ```
/// use publish_props_core::{ExtensionAware, Module};
///
/// let mut module = Module::new(":library");
/// module.set_extra_property("centralPortalUsername", "alice").unwrap();
/// let extra = module.extra_properties().unwrap();
/// assert_eq!(extra.central_portal_username(), Some("alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    path: String,
    dir: Option<PathBuf>,
    extra: Option<ExtraProperties>,
}

impl Module {
    /// A module with an empty namespace.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dir: None,
            extra: Some(ExtraProperties::new()),
        }
    }

    /// A module that rejects extra properties.
    pub fn without_extra_properties(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dir: None,
            extra: None,
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn extra_properties(&self) -> Option<&ExtraProperties> {
        self.extra.as_ref()
    }
}

impl ExtensionAware for Module {
    fn path(&self) -> &str {
        &self.path
    }

    fn has_extra_properties(&self) -> bool {
        self.extra.is_some()
    }

    fn set_extra_property(&mut self, key: &str, value: &str) -> crate::Result<()> {
        let extra = self
            .extra
            .as_mut()
            .ok_or_else(|| crate::Error::InjectionFailure {
                module: self.path.clone(),
            })?;
        extra.set(key, value);
        Ok(())
    }
}

/// The root module followed by every sub-module.
///
/// **Invariant:** the first module is the root (`:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleScope {
    modules: Vec<Module>,
}

impl ModuleScope {
    /// A scope holding only the root module.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            modules: vec![Module::new(ROOT_MODULE_PATH).with_dir(root_dir)],
        }
    }

    /// Add a sub-module; `name` gets the `:` prefix if it lacks one.
    ///
    /// A path already in scope (the root `:` included) is not added twice.
    pub fn with_module(mut self, name: &str, dir: Option<PathBuf>) -> Self {
        let path = if name.starts_with(':') {
            name.to_owned()
        } else {
            format!(":{name}")
        };
        if self.get(&path).is_some() {
            tracing::debug!(path = %path, "module already in scope");
            return self;
        }
        let module = Module::new(path);
        self.modules.push(match dir {
            Some(dir) => module.with_dir(dir),
            None => module,
        });
        self
    }

    /// Discover the Cargo workspace containing `root_dir`.
    ///
    /// The workspace root becomes the root module; every workspace member
    /// whose manifest does not live in the root directory becomes `:name`.
    ///
    /// # Errors
    ///
    /// [`Error::CargoMetadata`](crate::Error::CargoMetadata) if
    /// `cargo metadata` fails (e.g. cargo not installed, no Cargo.toml).
    pub fn discover(root_dir: &Path) -> crate::Result<Self> {
        let manifest_path = root_dir.join("Cargo.toml");
        tracing::debug!(path = %manifest_path.display(), "running cargo metadata");

        let metadata = MetadataCommand::new()
            .manifest_path(&manifest_path)
            .no_deps()
            .exec()
            .map_err(|e| crate::Error::CargoMetadata {
                manifest_path: manifest_path.clone(),
                detail: e.to_string(),
            })?;

        let workspace_root = PathBuf::from(metadata.workspace_root.as_std_path());
        let mut scope = Self::new(workspace_root.clone());

        for package in metadata.workspace_packages() {
            let package_dir = package
                .manifest_path
                .as_std_path()
                .parent()
                .map(Path::to_path_buf);
            if package_dir.as_deref() == Some(workspace_root.as_path()) {
                continue;
            }
            scope = scope.with_module(&package.name, package_dir);
        }

        tracing::debug!(
            workspace_root = %workspace_root.display(),
            modules = scope.len(),
            "module scope discovered"
        );
        Ok(scope)
    }

    pub fn root(&self) -> &Module {
        &self.modules[0]
    }

    pub fn get(&self, path: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.path() == path)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut [Module] {
        &mut self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_paths_are_added_once() {
        let scope = ModuleScope::new("/proj")
            .with_module(ROOT_MODULE_PATH, None)
            .with_module("library", None)
            .with_module(":library", Some(PathBuf::from("/proj/library")));

        let paths: Vec<&str> = scope.modules().iter().map(Module::path).collect();
        assert_eq!(paths, vec![ROOT_MODULE_PATH, ":library"]);
        assert_eq!(scope.root().dir(), Some(Path::new("/proj")));
        assert_eq!(scope.get(":library").unwrap().dir(), None);
    }

    #[test]
    fn root_comes_first() {
        let scope = ModuleScope::new("/proj")
            .with_module("library", Some(PathBuf::from("/proj/library")))
            .with_module(":sample", None);

        let paths: Vec<&str> = scope.modules().iter().map(Module::path).collect();
        assert_eq!(paths, vec![":", ":library", ":sample"]);
        assert_eq!(scope.root().dir(), Some(Path::new("/proj")));
        assert_eq!(
            scope.get(":library").and_then(Module::dir),
            Some(Path::new("/proj/library"))
        );
    }

    #[test]
    fn module_without_namespace_rejects_writes() {
        let mut module = Module::without_extra_properties(":legacy");
        assert!(!module.has_extra_properties());
        let err = module.set_extra_property("k", "v").unwrap_err();
        assert!(err.to_string().contains(":legacy"), "got: {err}");
    }
}
