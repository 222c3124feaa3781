use std::collections::BTreeMap;
use std::path::Path;

use publish_props_core::{ModuleScope, PropagationConfig};

use super::OutputFormat;

/// Propagate publish.properties into every module and print the result.
///
/// Secret values are redacted in both output formats.
pub fn propagate(root: &Path, modules: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let config = PropagationConfig::load(root)?;
    let mut scope = module_scope(&config, modules)?;

    let report = publish_props_core::propagate(&config, scope.modules_mut())?;
    if report.is_noop() {
        eprintln!(
            "No publish properties found at {}",
            config.property_file_path().display()
        );
    }

    let namespaces: BTreeMap<&str, BTreeMap<String, String>> = scope
        .modules()
        .iter()
        .map(|m| {
            let values = m.extra_properties().map(|e| e.redacted()).unwrap_or_default();
            (m.path(), values)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "root": config.root_dir(),
                "keys": report.keys,
                "modules": namespaces,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for (path, values) in &namespaces {
                println!("{path}");
                for (key, value) in values {
                    println!("  {key} = {value}");
                }
            }
        }
    }

    Ok(())
}

fn module_scope(config: &PropagationConfig, modules: &[String]) -> anyhow::Result<ModuleScope> {
    let root_dir = config.root_dir();

    if !modules.is_empty() {
        return Ok(modules
            .iter()
            .fold(ModuleScope::new(root_dir), |scope, name| {
                scope.with_module(name, None)
            }));
    }

    if root_dir.join("Cargo.toml").exists() {
        return Ok(ModuleScope::discover(root_dir)?);
    }

    tracing::warn!(
        root = %root_dir.display(),
        "no Cargo.toml and no --module given; propagating to the root module only"
    );
    Ok(ModuleScope::new(root_dir))
}
