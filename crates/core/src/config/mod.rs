//! Framework and mod configuration
//!
//! Settings live in TOML files under `{MODFORGE_DIR}/configs/`. One file
//! tunes the framework itself ([`CoreConfig`]); each consumer mod gets its
//! own file through the [`ModConfig`] trait. A missing file is written out
//! with defaults on first load, so a fresh install always starts from a
//! complete, editable config rather than an empty directory.

mod loader;

use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use loader::{configs_dir, core_config_path, mod_config_path, modforge_base_dir, BASE_DIR_ENV};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not valid TOML for the target type
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The value could not be rendered as TOML
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The framework base directory is unknown
    #[error("MODFORGE_DIR is not set")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

fn read_toml<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(value)?)?;
    Ok(())
}

/// Load from `path`, writing the default out first when no file exists yet.
fn load_or_init<T>(path: &Path) -> ConfigResult<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    if path.exists() {
        let value = read_toml(path)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(value)
    } else {
        let value = T::default();
        write_toml(path, &value)?;
        tracing::info!("Wrote default config to {:?}", path);
        Ok(value)
    }
}

/// Per-mod configuration.
///
/// A mod declares a settings struct, derives serde on it, and names itself;
/// the framework handles file placement and the create-on-first-load step.
/// Files land at `configs/mods/{MOD_NAME}/{MOD_NAME}.toml` under the base
/// directory.
///
/// ```ignore
/// use serde::{Deserialize, Serialize};
/// use modforge_core::ModConfig;
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct GreeterConfig {
///     greeting: String,
/// }
///
/// impl ModConfig for GreeterConfig {
///     const MOD_NAME: &'static str = "greeter";
/// }
///
/// let config = GreeterConfig::load().unwrap_or_default();
/// ```
pub trait ModConfig: Default + Serialize + DeserializeOwned + Send + Sync {
    /// Name used for the config file path
    const MOD_NAME: &'static str;

    /// Load this mod's config, creating the file with defaults if missing.
    fn load() -> ConfigResult<Self> {
        load_or_init(&mod_config_path(Self::MOD_NAME)?)
    }

    /// Write the current values back to the config file.
    fn save(&self) -> ConfigResult<()> {
        write_toml(&mod_config_path(Self::MOD_NAME)?, self)
    }
}

/// Framework-level tuning, loaded from `configs/core.toml`.
///
/// Unknown runtime knobs deliberately do not live here; anything a mod can
/// subscribe its way around stays out of the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config format version, for migrations
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Warn when one frame of dispatch work exceeds this many microseconds
    pub frame_budget_warn_us: u64,

    /// Frames of a pickup's life to skip before it counts as initialized
    pub pickup_init_skip_frames: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            frame_budget_warn_us: 2_000,
            pickup_init_skip_frames: 1,
        }
    }
}

impl CoreConfig {
    /// Load the core config, creating the file with defaults if missing.
    pub fn load() -> ConfigResult<Self> {
        load_or_init(&core_config_path()?)
    }

    /// Write the current values back to `configs/core.toml`.
    pub fn save(&self) -> ConfigResult<()> {
        write_toml(&core_config_path()?, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    use parking_lot::Mutex;

    // MODFORGE_DIR is process-global; tests touching it take this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());
    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    fn scratch_base_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "modforge-config-test-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct GreeterConfig {
        greeting: String,
        volume: i32,
    }

    impl ModConfig for GreeterConfig {
        const MOD_NAME: &'static str = "greeter";
    }

    #[test]
    fn test_first_load_creates_default_file() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var(BASE_DIR_ENV, scratch_base_dir());

        let config = GreeterConfig::load().unwrap();
        assert_eq!(config, GreeterConfig::default());

        let path = mod_config_path(GreeterConfig::MOD_NAME).unwrap();
        assert!(path.exists());
        assert!(path.ends_with("configs/mods/greeter/greeter.toml"));
    }

    #[test]
    fn test_saved_values_load_back() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var(BASE_DIR_ENV, scratch_base_dir());

        let config = GreeterConfig {
            greeting: "hello there".to_string(),
            volume: 7,
        };
        config.save().unwrap();

        assert_eq!(GreeterConfig::load().unwrap(), config);
    }

    #[test]
    fn test_missing_base_dir_is_an_error() {
        let _guard = ENV_LOCK.lock();
        std::env::remove_var(BASE_DIR_ENV);

        assert!(matches!(
            GreeterConfig::load(),
            Err(ConfigError::NoConfigDirectory)
        ));
    }

    #[test]
    fn test_core_config_create_on_first_load() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var(BASE_DIR_ENV, scratch_base_dir());

        let config = CoreConfig::load().unwrap();
        assert_eq!(config.version, 1);
        assert!(core_config_path().unwrap().exists());
    }

    #[test]
    fn test_core_config_default() {
        let config = CoreConfig::default();
        assert_eq!(config.version, 1);
        assert!(!config.debug);
        assert_eq!(config.pickup_init_skip_frames, 1);
    }

    #[test]
    fn test_core_config_partial_file_uses_defaults() {
        let config: CoreConfig = toml::from_str("debug = true").unwrap();
        assert!(config.debug);
        assert_eq!(config.version, 1);
        assert_eq!(config.frame_budget_warn_us, 2_000);
    }
}
