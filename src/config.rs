use std::path::PathBuf;

use crate::error::ConfigError;

pub const TOKEN_VAR: &str = "TELOXIDE_TOKEN";
pub const CONTENT_DIR_VAR: &str = "CONTENT_DIR";
const DEFAULT_CONTENT_DIR: &str = "content";

/// Runtime settings, from the environment or a `.env` file.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub content_dir: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("content_dir", &self.content_dir)
            .finish()
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is fine, the variables may come from the environment.
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = match lookup(TOKEN_VAR) {
            Some(token) if token.trim().is_empty() => return Err(ConfigError::Empty(TOKEN_VAR)),
            Some(token) => token,
            None => return Err(ConfigError::Missing(TOKEN_VAR)),
        };
        let content_dir = match lookup(CONTENT_DIR_VAR) {
            Some(dir) if dir.trim().is_empty() => return Err(ConfigError::Empty(CONTENT_DIR_VAR)),
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(DEFAULT_CONTENT_DIR),
        };
        Ok(Self { token, content_dir })
    }
}
