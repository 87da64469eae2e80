//! Config path resolution
//!
//! Handles resolving paths for configuration files based on the framework's
//! base directory.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Environment variable naming the framework base directory
pub const BASE_DIR_ENV: &str = "MODFORGE_DIR";

/// Returns the modforge base directory.
///
/// The host sets `MODFORGE_DIR` to the directory the framework was loaded
/// from; everything else (configs, logs) lives underneath it.
pub fn modforge_base_dir() -> ConfigResult<PathBuf> {
    std::env::var_os(BASE_DIR_ENV)
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the base configs directory.
///
/// Path: `{MODFORGE_DIR}/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(modforge_base_dir()?.join("configs"))
}

/// Returns the path for a mod's config file.
///
/// Path: `{MODFORGE_DIR}/configs/mods/{mod_name}/{mod_name}.toml`
pub fn mod_config_path(mod_name: &str) -> ConfigResult<PathBuf> {
    let base = configs_dir()?;
    Ok(base
        .join("mods")
        .join(mod_name)
        .join(format!("{}.toml", mod_name)))
}

/// Returns the core framework config path.
///
/// Path: `{MODFORGE_DIR}/configs/core.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("core.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_config_path_format() {
        let base = PathBuf::from("/opt/game/modforge");
        let expected = base
            .join("configs")
            .join("mods")
            .join("my_mod")
            .join("my_mod.toml");

        assert!(expected.ends_with("mods/my_mod/my_mod.toml"));
    }
}
