//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::AggregatorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Comma separated list of Host header values to probe.
pub const HOSTNAMES_ENV: &str = "HEALTH_CHECK_HOSTNAMES";

/// Port the probed hosts listen on locally.
pub const HOST_PORT_ENV: &str = "HEALTH_CHECK_HOST_PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{var} is not a valid port: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<AggregatorConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply `HEALTH_CHECK_*` overrides using the given variable lookup.
///
/// Empty values count as unset. Empty entries in the hostname list are
/// dropped.
pub fn apply_env_overrides<F>(config: &mut AggregatorConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(HOSTNAMES_ENV).filter(|v| !v.trim().is_empty()) {
        config.backend.hostnames = raw
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(raw) = lookup(HOST_PORT_ENV).filter(|v| !v.trim().is_empty()) {
        config.backend.port = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            var: HOST_PORT_ENV,
            value: raw.clone(),
        })?;
    }

    Ok(())
}

/// Build the startup configuration.
///
/// Defaults, then the optional TOML file, then the process environment, then
/// the listen port override. The result is validated before it is returned.
pub fn load_config(
    path: Option<&Path>,
    listen_port: Option<u16>,
) -> Result<AggregatorConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => AggregatorConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;

    if let Some(port) = listen_port {
        config.listener.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_sets_hostnames_and_port() {
        let mut config = AggregatorConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[(HOSTNAMES_ENV, "a.example.com, b.example.com,,"), (HOST_PORT_ENV, "8080")]),
        )
        .unwrap();

        assert_eq!(config.backend.hostnames, vec!["a.example.com", "b.example.com"]);
        assert_eq!(config.backend.port, 8080);
    }

    #[test]
    fn empty_port_keeps_default() {
        let mut config = AggregatorConfig::default();
        apply_env_overrides(&mut config, env(&[(HOST_PORT_ENV, "")])).unwrap();
        assert_eq!(config.backend.port, 80);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = AggregatorConfig::default();
        let err = apply_env_overrides(&mut config, env(&[(HOST_PORT_ENV, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: HOST_PORT_ENV, .. }));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config: AggregatorConfig = toml::from_str(
            r#"
            [backend]
            hostnames = ["from-file"]
            port = 8000
            "#,
        )
        .unwrap();
        apply_env_overrides(&mut config, env(&[(HOSTNAMES_ENV, "from-env")])).unwrap();

        assert_eq!(config.backend.hostnames, vec!["from-env"]);
        assert_eq!(config.backend.port, 8000);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_config(Path::new("/nonexistent/health-aggregator.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn validation_errors_are_joined() {
        let err = ConfigError::Validation(vec![
            ValidationError::NoHostnames,
            ValidationError::ZeroPort("listener.port"),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: backend.hostnames must list at least one host, listener.port must not be 0"
        );
    }
}
