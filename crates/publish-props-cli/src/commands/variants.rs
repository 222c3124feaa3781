use std::path::Path;

use publish_props_core::{BuildVariant, PublishPropsConfig, VariantGate};

use super::OutputFormat;

pub fn variants(root: &Path, names: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let settings = PublishPropsConfig::load(root)?;
    let names: &[String] = if names.is_empty() {
        &settings.variants.declared
    } else {
        names
    };

    let gate = VariantGate::new(settings.variants.release.as_str());
    let mut variants: Vec<BuildVariant> = names.iter().map(BuildVariant::new).collect();
    gate.evaluate_all(&mut variants);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&variants)?),
        OutputFormat::Text => {
            for variant in &variants {
                println!("{:<16} {}", variant.name(), variant.state());
            }
        }
    }

    if !variants.iter().any(BuildVariant::is_enabled) {
        tracing::warn!(
            release = gate.release(),
            "release variant not declared; nothing will be packaged"
        );
    }

    Ok(())
}
