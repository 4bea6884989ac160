//! Startup settings resolved once from the config file, the environment and
//! command-line flags, then handed to the session store and dispatcher.

use crate::core::config::data::Config;
use crate::core::config::io::{project_dirs, ConfigError};
use crate::core::mode::Mode;
use std::path::PathBuf;

pub const BACKEND_ROUTE_ENV: &str = "FLAVA_BACKEND_ROUTE";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend_route: String,
    pub storage_key: String,
    pub data_dir: PathBuf,
    pub default_mode: Mode,
}

/// Values supplied on the command line. They win over everything else.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub backend_route: Option<String>,
    pub mode: Option<Mode>,
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(config: &Config, overrides: SettingsOverrides) -> Result<Self, ConfigError> {
        let env_route = std::env::var(BACKEND_ROUTE_ENV).ok();
        let data_dir = match overrides.data_dir.clone().or_else(|| config.data_dir.clone()) {
            Some(dir) => dir,
            None => project_dirs()?.data_dir().to_path_buf(),
        };
        Ok(Self::resolve_with(config, overrides, env_route, data_dir))
    }

    /// Precedence: flag, then environment, then config file, then default.
    pub fn resolve_with(
        config: &Config,
        overrides: SettingsOverrides,
        env_route: Option<String>,
        data_dir: PathBuf,
    ) -> Self {
        let backend_route = overrides
            .backend_route
            .or(env_route)
            .filter(|route| !route.trim().is_empty())
            .unwrap_or_else(|| config.backend_route_or_default().to_string());

        Self {
            backend_route,
            storage_key: config.storage_key_or_default().to_string(),
            data_dir,
            default_mode: overrides
                .mode
                .unwrap_or_else(|| config.default_mode_or_default()),
        }
    }
}
