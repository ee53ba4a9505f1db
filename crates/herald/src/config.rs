use crate::error::{HeraldError, HeraldErrorExt};
use config::{Config, Environment, File};
use herald_logger::LogConfig;
use herald_registry::RegistryConfig;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file looked up in the working directory when no path is given (any supported extension).
pub const DEFAULT_CONFIG_FILE: &str = "herald";
/// Prefix of environment overrides, e.g. `HERALD__LOG__LEVEL=debug`.
pub const ENV_PREFIX: &str = "HERALD";

/// Top-level host configuration.
///
/// ```toml
/// [log]
/// level = "debug"
/// filter = "herald_registry=trace"
///
/// [registry]
/// category_capacity = 32
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeraldConfig {
    pub log: LogConfig,
    pub registry: RegistryConfig,
}

/// Loads `T` from a config file overlaid with `HERALD__`-prefixed environment variables.
///
/// Nested keys use double underscores: `HERALD__REGISTRY__CATEGORY_CAPACITY` maps to
/// `registry.category_capacity`.
///
/// An explicit `path` must exist. Without one, the `herald` file in the working directory is
/// used if present, and defaults apply otherwise.
///
/// # Errors
/// Returns [`HeraldError::Config`] if an explicit file is missing, a source is malformed, or
/// the merged values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use herald::config::{HeraldConfig, load_config};
///
/// let cfg: HeraldConfig = load_config(None::<&str>).unwrap_or_default();
/// assert!(cfg.log.console);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, HeraldError>
where
    T: DeserializeOwned,
{
    load_config_from(path.as_ref().map(AsRef::<Path>::as_ref), environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").convert_case(config::Case::Snake)
}

pub(crate) fn load_config_from<T>(
    path: Option<&Path>,
    environment: Environment,
) -> Result<T, HeraldError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(environment);

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
