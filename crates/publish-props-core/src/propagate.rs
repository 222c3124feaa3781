use crate::config::PropagationConfig;
use crate::inject::{ExtensionAware, PropertyInjector};
use crate::properties::PropertySource;
use crate::resolver::PathResolver;

/// What a propagation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Number of keys written into each module
    pub keys: usize,
    /// Paths of the modules that received them, in order
    pub modules: Vec<String>,
}

impl PropagationReport {
    /// True when no property file was found (or it was empty).
    pub fn is_noop(&self) -> bool {
        self.keys == 0
    }
}

/// Load the property file once and write the same resolved pairs into
/// every module.
///
/// ```text
/// PropertySource::load ──▶ empty? ──yes──▶ done, nothing touched
///                             │
///                             no
///                             ▼
///                  PathResolver::apply (once)
///                             ▼
///              every module has a namespace? ──no──▶ InjectionFailure
///                             │
///                            yes
///                             ▼
///          PropertyInjector::inject (once per module)
/// ```
///
/// Must run before anything reads a module's namespace. Every error is
/// fatal, and none of them leaves a module partly written: the file is
/// parsed and every module is checked before the first write.
pub fn propagate<M: ExtensionAware>(
    config: &PropagationConfig,
    modules: &mut [M],
) -> crate::Result<PropagationReport> {
    let mut properties = PropertySource::load(config)?;
    if properties.is_empty() {
        return Ok(PropagationReport::default());
    }

    PathResolver::apply(&mut properties, config)?;

    if let Some(rejecting) = modules.iter().find(|m| !m.has_extra_properties()) {
        return Err(crate::Error::InjectionFailure {
            module: rejecting.path().to_owned(),
        });
    }

    for module in modules.iter_mut() {
        PropertyInjector::inject(&properties, module)?;
    }

    let report = PropagationReport {
        keys: properties.len(),
        modules: modules.iter().map(|m| m.path().to_owned()).collect(),
    };
    tracing::info!(
        keys = report.keys,
        modules = report.modules.len(),
        root = %config.root_dir().display(),
        "publish properties propagated"
    );
    Ok(report)
}
