use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

/// Yo, this PooperScooper. Need any poop scooped?
#[derive(Parser, Debug)]
#[command(name = "pooper-scooper", version)]
pub struct Cli {
    /// Credentials document (platform token, API keys, feature settings)
    #[arg(long, env = "POOPER_CREDENTIALS", default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// If set, logging level is now DEBUG
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    ReadFile { path: PathBuf, source: std::io::Error },
    ParseJson { path: PathBuf, source: serde_json::Error },
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read credentials '{}': {source}", path.display())
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse credentials '{}': {source}", path.display())
            }
            Self::Validation(msg) => write!(f, "invalid credentials: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GrammarConfig {
    /// Users whose your/you're mistakes get counted.
    #[serde(default)]
    pub watched_users: Vec<u64>,
}

/// Reaction-role mapping for one role-selection channel.
#[derive(Deserialize, Debug, Clone)]
pub struct RolesConfig {
    pub guild_id: u64,
    pub channel_id: u64,
    /// Emoji name (unicode emoji or custom emoji name) to role id.
    pub reactions: HashMap<String, u64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub token: String,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub grammar: GrammarConfig,
    #[serde(default)]
    pub roles: Option<RolesConfig>,
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&raw).map_err(|source| ConfigError::ParseJson {
            path: path.to_path_buf(),
            source,
        })?;

        if let Ok(token) = std::env::var("DISCORD_TOKEN") {
            config.token = token;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::Validation("`token` must not be empty".to_string()));
        }
        if self.prefix.is_empty() {
            return Err(ConfigError::Validation("`prefix` must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub fn image_generation_enabled(&self) -> bool {
        self.gemini_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_credentials_use_defaults() {
        let config = Config::from_json(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(config.prefix, "!");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.roles.is_none());
        assert!(config.grammar.watched_users.is_empty());
        assert!(!config.image_generation_enabled());
    }

    #[test]
    fn test_legacy_client_id_is_ignored() {
        let config = Config::from_json(r#"{"token": "abc", "client_id": "42"}"#).unwrap();
        assert_eq!(config.token, "abc");
    }

    #[test]
    fn test_full_credentials() {
        let config = Config::from_json(
            r#"{
                "token": "abc",
                "client_id": "42",
                "gemini_api_key": "key",
                "prefix": "?",
                "data_dir": "/tmp/scoop",
                "grammar": {"watched_users": [786822389610577921]},
                "roles": {
                    "guild_id": 932057681307512922,
                    "channel_id": 1039778596836868208,
                    "reactions": {"🧼": 1037114560961851553}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.prefix, "?");
        assert!(config.image_generation_enabled());
        assert_eq!(config.data_file("birthdays.json"), PathBuf::from("/tmp/scoop/birthdays.json"));
        assert_eq!(config.grammar.watched_users, vec![786822389610577921]);
        let roles = config.roles.unwrap();
        assert_eq!(roles.reactions.get("🧼"), Some(&1037114560961851553));
    }

    #[test]
    fn test_missing_token_is_rejected() {
        assert!(Config::from_json(r#"{"prefix": "!"}"#).is_err());
    }

    #[test]
    fn test_blank_token_fails_validation() {
        let config = Config::from_json(r#"{"token": "  "}"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_cli_parses_debug_flag() {
        let cli = Cli::parse_from(["pooper-scooper", "-d", "--credentials", "creds.json"]);
        assert!(cli.debug);
        assert_eq!(cli.credentials, PathBuf::from("creds.json"));
    }
}
