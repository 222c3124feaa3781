use std::fmt;
use std::path::Path;

use publish_props_core::module::ROOT_MODULE_PATH;
use publish_props_core::publishing::{CENTRAL_PORTAL_PASSWORD_ENV, CENTRAL_PORTAL_USERNAME_ENV};
use publish_props_core::{
    BuildVariant, CentralPortalCredentials, ExtraProperties, Module, PropagationConfig,
    PublishPropsConfig, SigningConfig, VariantGate,
};

pub fn doctor(root: &Path) -> anyhow::Result<()> {
    let settings = PublishPropsConfig::load(root)?;
    let config = PropagationConfig::from_settings(root, &settings.propagation)?;

    let mut report = DoctorReport::default();
    let mut module = Module::new(ROOT_MODULE_PATH).with_dir(config.root_dir());

    let property_path = config.property_file_path();
    report.property_file = match publish_props_core::propagate(
        &config,
        std::slice::from_mut(&mut module),
    ) {
        Ok(r) if r.is_noop() => {
            CheckResult::fail(&format!("{} not found or empty", property_path.display()))
        }
        Ok(r) => CheckResult::ok(&format!("{} ({} keys)", property_path.display(), r.keys)),
        Err(e) => CheckResult::fail(&format!("{:#}", anyhow::Error::new(e))),
    };

    let empty = ExtraProperties::new();
    let extra = module.extra_properties().unwrap_or(&empty);

    report.signing = match SigningConfig::from_extra(extra) {
        Some(signing) => CheckResult::ok(&format!("key {}", signing.key_id)),
        None => CheckResult::fail(&format!(
            "missing {}",
            SigningConfig::missing_keys(extra).join(", ")
        )),
    };

    report.key_ring = match extra.signing_key_ring_file() {
        Some(path) if path.is_file() => CheckResult::ok(&path.display().to_string()),
        Some(path) => CheckResult::fail(&format!("{} does not exist", path.display())),
        None => CheckResult::fail("not set"),
    };

    report.upload = match CentralPortalCredentials::from_extra(extra) {
        Some(creds) => CheckResult::ok(&format!(
            "{} ({})",
            creds.username, settings.publishing.publishing_type
        )),
        None => CheckResult::fail(&format!(
            "set centralPortalUsername/centralPortalPassword or {CENTRAL_PORTAL_USERNAME_ENV}/{CENTRAL_PORTAL_PASSWORD_ENV}"
        )),
    };

    let gate = VariantGate::new(settings.variants.release.as_str());
    let mut variants: Vec<BuildVariant> = settings
        .variants
        .declared
        .iter()
        .map(BuildVariant::new)
        .collect();
    gate.evaluate_all(&mut variants);
    report.variants = if variants.iter().any(BuildVariant::is_enabled) {
        let disabled: Vec<&str> = variants
            .iter()
            .filter(|v| !v.is_enabled())
            .map(BuildVariant::name)
            .collect();
        CheckResult::ok(&format!(
            "{} enabled; disabled: {}",
            gate.release(),
            if disabled.is_empty() {
                "(none)".to_owned()
            } else {
                disabled.join(", ")
            }
        ))
    } else {
        CheckResult::fail(&format!("'{}' is not a declared variant", gate.release()))
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed; see above for details");
    }

    Ok(())
}

#[derive(Debug, Default, Clone)]
struct DoctorReport {
    property_file: CheckResult,
    signing: CheckResult,
    key_ring: CheckResult,
    upload: CheckResult,
    variants: CheckResult,
}

impl DoctorReport {
    fn all_passed(&self) -> bool {
        self.property_file.passed
            && self.signing.passed
            && self.key_ring.passed
            && self.upload.passed
            && self.variants.passed
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Property file", &self.property_file),
            ("Signing", &self.signing),
            ("Key ring", &self.key_ring),
            ("Upload", &self.upload),
            ("Variants", &self.variants),
        ];
        for (label, check) in rows {
            writeln!(f, "{label:<14} [{}] {}", check.icon(), check.detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
struct CheckResult {
    passed: bool,
    detail: String,
}

impl CheckResult {
    fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}
