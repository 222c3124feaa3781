use std::path::{Component, Path, PathBuf};

use crate::config::{PropagationConfig, SIGNING_KEY_RING_FILE};
use crate::properties::PropertyFile;

/// Rewrites the signing key ring entry into an absolute path under the root.
pub struct PathResolver;

impl PathResolver {
    /// Resolve [`SIGNING_KEY_RING_FILE`] in place. Other keys are untouched.
    ///
    /// The resolved file does not have to exist; the signing step checks that.
    ///
    /// # Errors
    ///
    /// [`Error::UnresolvablePath`](crate::Error::UnresolvablePath) if the value
    /// is blank or cannot form a path.
    pub fn apply(properties: &mut PropertyFile, config: &PropagationConfig) -> crate::Result<()> {
        let key = SIGNING_KEY_RING_FILE;
        let Some(value) = properties.get(key) else {
            return Ok(());
        };

        let resolved = Self::resolve(config.root_dir(), value).map_err(|reason| {
            crate::Error::UnresolvablePath {
                key: key.to_owned(),
                value: value.to_owned(),
                root: config.root_dir().to_path_buf(),
                reason,
            }
        })?;
        let resolved = resolved
            .into_os_string()
            .into_string()
            .map_err(|_| crate::Error::UnresolvablePath {
                key: key.to_owned(),
                value: value.to_owned(),
                root: config.root_dir().to_path_buf(),
                reason: "resolved path is not valid UTF-8",
            })?;

        tracing::debug!(key, path = %resolved, "resolved path property");
        properties.insert(key, resolved);
        Ok(())
    }

    /// Anchor `value` at `root`. Absolute values are kept as they are.
    ///
    /// `.` and `..` are folded lexically; symlinks are not followed and the
    /// filesystem is never touched.
    pub fn resolve(root: &Path, value: &str) -> Result<PathBuf, &'static str> {
        if value.trim().is_empty() {
            return Err("path is empty");
        }
        if value.contains('\0') {
            return Err("path contains a NUL byte");
        }
        let absolute =
            std::path::absolute(root.join(value)).map_err(|_| "path cannot be made absolute")?;
        Ok(normalize(&absolute))
    }
}

/// Drop `.` and pop one component per `..`. A `..` at the filesystem root
/// stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PropagationConfig {
        PropagationConfig::new("/proj").unwrap()
    }

    #[test]
    fn relative_key_ring_is_anchored_at_root() {
        let mut props: PropertyFile = [(SIGNING_KEY_RING_FILE, "keys/secring.gpg")]
            .into_iter()
            .collect();
        PathResolver::apply(&mut props, &config()).unwrap();
        assert_eq!(
            props.get(SIGNING_KEY_RING_FILE),
            Some("/proj/keys/secring.gpg")
        );
    }

    #[test]
    fn absolute_key_ring_is_kept() {
        let mut props: PropertyFile = [(SIGNING_KEY_RING_FILE, "/secure/secring.gpg")]
            .into_iter()
            .collect();
        PathResolver::apply(&mut props, &config()).unwrap();
        assert_eq!(props.get(SIGNING_KEY_RING_FILE), Some("/secure/secring.gpg"));
    }

    #[test]
    fn current_dir_components_are_dropped() {
        let resolved = PathResolver::resolve(Path::new("/proj"), "./keys/./secring.gpg").unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/keys/secring.gpg"));
    }

    #[test]
    fn parent_dir_components_are_folded() {
        let resolved = PathResolver::resolve(Path::new("/proj"), "../shared/secring.gpg").unwrap();
        assert_eq!(resolved, PathBuf::from("/shared/secring.gpg"));

        let resolved =
            PathResolver::resolve(Path::new("/proj/app"), "keys/../../keys/secring.gpg").unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/keys/secring.gpg"));
    }

    #[test]
    fn parent_dir_never_climbs_above_filesystem_root() {
        let resolved = PathResolver::resolve(Path::new("/"), "../../secring.gpg").unwrap();
        assert_eq!(resolved, PathBuf::from("/secring.gpg"));
    }

    #[test]
    fn other_keys_pass_through() {
        let mut props: PropertyFile = [("signing.keyId", "keys/not-a-path"), ("a", "b")]
            .into_iter()
            .collect();
        let before = props.clone();
        PathResolver::apply(&mut props, &config()).unwrap();
        assert_eq!(props, before);
    }

    #[test]
    fn only_the_key_ring_entry_is_resolved() {
        let mut props: PropertyFile = [
            ("keystore.file", "release.jks"),
            (SIGNING_KEY_RING_FILE, "keys/secring.gpg"),
        ]
        .into_iter()
        .collect();
        PathResolver::apply(&mut props, &config()).unwrap();
        assert_eq!(props.get("keystore.file"), Some("release.jks"));
        assert_eq!(
            props.get(SIGNING_KEY_RING_FILE),
            Some("/proj/keys/secring.gpg")
        );
    }

    #[test]
    fn blank_value_is_unresolvable() {
        let mut props: PropertyFile = [(SIGNING_KEY_RING_FILE, "  ")].into_iter().collect();
        let err = PathResolver::apply(&mut props, &config()).unwrap_err();
        assert!(matches!(err, crate::Error::UnresolvablePath { .. }), "got: {err}");
        assert!(err.to_string().contains(SIGNING_KEY_RING_FILE));
    }

    #[test]
    fn nul_byte_is_unresolvable() {
        assert!(PathResolver::resolve(Path::new("/proj"), "keys/\0ring").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn resolved_paths_are_absolute_and_under_root(
                segments in proptest::collection::vec("[a-z0-9_-]{1,8}", 1..5),
            ) {
                let value = segments.join("/");
                let resolved = PathResolver::resolve(Path::new("/proj"), &value).unwrap();
                prop_assert!(resolved.is_absolute());
                prop_assert!(resolved.starts_with("/proj"));
                prop_assert!(resolved.ends_with(&value));
            }
        }
    }
}
