use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to resolve root directory {path}")]
    RootResolve {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Property source ──
    #[error("failed to read property file {path}")]
    PropertyFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed property file {path}")]
    MalformedSource {
        path: PathBuf,
        source: crate::properties::ParseError,
    },

    #[error("cannot resolve '{key}' = {value:?} against {root}: {reason}")]
    UnresolvablePath {
        key: String,
        value: String,
        root: PathBuf,
        reason: &'static str,
    },

    #[error("module '{module}' does not accept extra properties")]
    InjectionFailure { module: String },

    // ── Module discovery ──
    #[error("cargo metadata failed for {manifest_path}: {detail}")]
    CargoMetadata {
        manifest_path: PathBuf,
        detail: String,
    },
}
