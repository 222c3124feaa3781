use std::path::Path;

use publish_props_core::PublishPropsConfig;

const PROPERTIES_TEMPLATE: &str = r#"# Local publish and signing settings. Never commit this file.
#
# Upload credentials (CENTRAL_PORTAL_USERNAME / CENTRAL_PORTAL_PASSWORD
# in the environment are used when these are absent)
#centralPortalUsername=
#centralPortalPassword=
#
# Signing; the key ring path is relative to this directory
#signing.keyId=
#signing.password=
#signing.secretKeyRingFile=keys/secring.gpg
"#;

/// Create a publish.properties template and make sure git ignores it.
pub fn init(root: &Path) -> anyhow::Result<()> {
    let settings = PublishPropsConfig::load(root)?;
    let property_file = &settings.propagation.property_file;

    let mut created = Vec::new();

    let properties_path = root.join(property_file);
    if properties_path.exists() {
        eprintln!("{property_file} already exists, skipping");
    } else {
        if let Some(parent) = properties_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&properties_path, PROPERTIES_TEMPLATE)?;
        created.push(format!("Created {property_file}"));
    }

    let gitignore_path = root.join(".gitignore");
    let gitignore = match std::fs::read_to_string(&gitignore_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    let entry = format!("/{property_file}");
    let ignored = gitignore
        .lines()
        .map(str::trim)
        .any(|line| line == property_file || line == entry);
    if ignored {
        eprintln!(".gitignore already lists {property_file}, skipping");
    } else {
        let mut updated = gitignore;
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(&entry);
        updated.push('\n');
        std::fs::write(&gitignore_path, updated)?;
        created.push(format!("Added {entry} to .gitignore"));
    }

    if created.is_empty() {
        println!("Nothing to create, already initialized.");
    } else {
        for line in &created {
            println!("{line}");
        }
    }

    println!();
    println!("Next steps:");
    println!();
    println!("  1. Fill in {property_file}");
    println!();
    println!("  2. Check readiness:");
    println!("     publish-props doctor");

    Ok(())
}
