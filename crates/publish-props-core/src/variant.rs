use std::fmt;

use serde::Serialize;

/// Lifecycle of a build variant within one invocation.
///
/// `Unevaluated` moves to `Enabled` or `Disabled` exactly once; both are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantState {
    #[default]
    Unevaluated,
    Enabled,
    Disabled,
}

impl fmt::Display for VariantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unevaluated => "unevaluated",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        })
    }
}

/// A named build variant (`release`, `debug`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildVariant {
    name: String,
    state: VariantState,
}

impl BuildVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: VariantState::Unevaluated,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> VariantState {
        self.state
    }

    /// Declared variants are enabled until the gate disables them.
    pub fn is_enabled(&self) -> bool {
        self.state != VariantState::Disabled
    }
}

/// Disables every variant except the release one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantGate {
    release: String,
}

impl Default for VariantGate {
    fn default() -> Self {
        Self::new("release")
    }
}

impl VariantGate {
    pub fn new(release: impl Into<String>) -> Self {
        Self {
            release: release.into(),
        }
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    /// Decide an unevaluated variant. An already decided variant is left as is.
    pub fn evaluate(&self, variant: &mut BuildVariant) -> VariantState {
        if variant.state == VariantState::Unevaluated {
            variant.state = if variant.name == self.release {
                VariantState::Enabled
            } else {
                VariantState::Disabled
            };
            tracing::debug!(variant = %variant.name, state = %variant.state, "variant evaluated");
        }
        variant.state
    }

    pub fn evaluate_all(&self, variants: &mut [BuildVariant]) {
        for variant in variants {
            self.evaluate(variant);
        }
    }
}
