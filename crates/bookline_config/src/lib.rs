// --- File: crates/bookline_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;

pub mod env_vars;
pub mod models;

pub use models::*;

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. serde defaults on [`AppConfig`]
/// 2. `<CONFIG_DIR>/default.*` (optional)
/// 3. `<CONFIG_DIR>/<RUN_ENV>.*` (optional)
/// 4. `BOOKLINE__SECTION__KEY` environment variables
///
/// Afterwards every `"secret_from_env"` marker is resolved from the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "loading config from {} and {} (prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Applies environment overrides based on "secret_from_env" markers in the serialized config.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    env_vars::inject_env_vars(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// The path comes from `DOTENV_OVERRIDE`, else from a first command line
/// argument starting with `.env`, else `.env`. Returns the path used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
