use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "gisttrack.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Delay of the simulated login, profile save and account deletion.
    pub simulated_delay_ms: u64,
    /// Keep starred/forked/favorite sets when the user logs out.
    pub keep_memberships_on_logout: bool,
    pub catalog_path: Option<String>,
    pub log_file: Option<String>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 1500,
            keep_memberships_on_logout: false,
            catalog_path: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Layers the blueprint, the user config, a `gisttrack.toml` in the CWD,
    /// an explicit `--config` file and `GISTTRACK_*` environment variables.
    pub fn new(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let mut files = vec![blueprint_path(), PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(user) = get_user_config_path() {
            files.insert(1, user);
        }
        Self::from_sources(&files, extra, environment())
    }

    #[cfg(test)]
    fn from_files(files: &[PathBuf], extra: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(files, extra, environment().source(Some(config::Map::new())))
    }

    fn from_sources(files: &[PathBuf], extra: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("simulated_delay_ms", defaults.simulated_delay_ms as i64)?
            .set_default("keep_memberships_on_logout", defaults.keep_memberships_on_logout)?
            .set_default("log_level", defaults.log_level)?;
        for path in files {
            builder = builder.add_source(File::from(path.clone()).required(false));
        }
        // An explicitly requested file must exist.
        if let Some(path) = extra {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }
        builder
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog_path.as_deref().map(expand)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(expand)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("GISTTRACK").try_parsing(true)
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn blueprint_path() -> PathBuf {
    match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(manifest_dir) => PathBuf::from(manifest_dir).join(CONFIG_FILE_NAME),
        // Release builds look next to the working directory instead.
        Err(_) => PathBuf::from(CONFIG_FILE_NAME),
    }
}

pub fn get_user_config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".config");
    path.push("gisttrack");
    path.push(CONFIG_FILE_NAME);
    Some(path)
}

/// Creates the user config from the blueprint (or the built-in defaults)
/// when it does not exist yet. Returns the path when a file was written.
pub fn ensure_user_config() -> anyhow::Result<Option<PathBuf>> {
    let Some(user_config_path) = get_user_config_path() else {
        return Ok(None);
    };
    write_user_config(&user_config_path, &blueprint_path())
}

fn write_user_config(user_config_path: &Path, blueprint: &Path) -> anyhow::Result<Option<PathBuf>> {
    if user_config_path.exists() {
        return Ok(None);
    }
    let content = match fs::read_to_string(blueprint) {
        Ok(content) => content,
        Err(_) => toml::to_string(&Settings::default())?,
    };
    if let Some(parent) = user_config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(user_config_path, content)?;
    Ok(Some(user_config_path.to_path_buf()))
}
