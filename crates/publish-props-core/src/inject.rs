use crate::properties::PropertyFile;

/// A build module that may carry an extended property namespace.
///
/// [`Module`](crate::Module) is the production implementation; tests use
/// mockall-generated mocks.
pub trait ExtensionAware {
    /// Module path, e.g. `:` for the root or `:library`.
    fn path(&self) -> &str;

    /// Whether the module exposes a namespace at all.
    fn has_extra_properties(&self) -> bool;

    /// Store one key, overwriting an existing value.
    fn set_extra_property(&mut self, key: &str, value: &str) -> crate::Result<()>;
}

/// Writes resolved properties into a module's namespace.
pub struct PropertyInjector;

impl PropertyInjector {
    /// Write every pair of `properties` into `module`. No key is filtered.
    ///
    /// # Errors
    ///
    /// [`Error::InjectionFailure`](crate::Error::InjectionFailure) if the
    /// module has no namespace.
    pub fn inject<M>(properties: &PropertyFile, module: &mut M) -> crate::Result<()>
    where
        M: ExtensionAware + ?Sized,
    {
        if !module.has_extra_properties() {
            return Err(crate::Error::InjectionFailure {
                module: module.path().to_owned(),
            });
        }

        for (key, value) in properties.iter() {
            module.set_extra_property(key, value)?;
        }

        tracing::debug!(
            module = module.path(),
            keys = properties.len(),
            "extra properties injected"
        );
        Ok(())
    }
}
