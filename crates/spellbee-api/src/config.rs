//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use spellbee_corpus::audio::DEFAULT_VOICE;
use spellbee_game::application::command_handlers::GameSettings;
use spellbee_game::domain::session::DEFAULT_WORD_COUNT;

use crate::error::AppError;

/// Where sessions are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    /// In this process only; lost on restart.
    Memory,
    /// `PostgreSQL` via `DATABASE_URL`.
    Postgres {
        /// Connection string.
        database_url: String,
    },
    /// Redis via `REDIS_URL`.
    Redis {
        /// Connection string.
        redis_url: String,
    },
}

impl SessionBackend {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres { .. } => "postgres",
            Self::Redis { .. } => "redis",
        }
    }
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: SessionBackend,
    pub session_ttl: Duration,
    pub words_per_game: usize,
    /// JSON array of candidate words.
    pub words_file: PathBuf,
    /// JSON object of word to definition(s).
    pub definitions_file: PathBuf,
    /// Directory of pre-generated pronunciation clips.
    pub audio_dir: PathBuf,
    pub audio_voice: String,
    pub audio_extension: String,
    /// Static front-end served for unmatched paths, if set.
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid, or a
    /// backend is selected without its connection URL.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let port: u16 = var("PORT", "8000")
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

        let ttl_secs: u64 = var("SESSION_TTL_SECS", "3600")
            .parse()
            .map_err(|e| AppError::Config(format!("SESSION_TTL_SECS must be seconds: {e}")))?;
        if ttl_secs == 0 {
            return Err(AppError::Config("SESSION_TTL_SECS must be positive".to_owned()));
        }

        let words_per_game: usize = var("WORDS_PER_GAME", &DEFAULT_WORD_COUNT.to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("WORDS_PER_GAME must be a count: {e}")))?;
        if words_per_game == 0 {
            return Err(AppError::Config("WORDS_PER_GAME must be positive".to_owned()));
        }

        let backend = match var("SESSION_BACKEND", "memory").to_ascii_lowercase().as_str() {
            "memory" => SessionBackend::Memory,
            "postgres" => SessionBackend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or_else(|| {
                    AppError::Config(
                        "DATABASE_URL environment variable must be set for the postgres backend"
                            .to_owned(),
                    )
                })?,
            },
            "redis" => SessionBackend::Redis {
                redis_url: lookup("REDIS_URL").ok_or_else(|| {
                    AppError::Config(
                        "REDIS_URL environment variable must be set for the redis backend"
                            .to_owned(),
                    )
                })?,
            },
            other => {
                return Err(AppError::Config(format!(
                    "SESSION_BACKEND must be memory, postgres or redis, got {other:?}"
                )));
            }
        };

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            backend,
            session_ttl: Duration::from_secs(ttl_secs),
            words_per_game,
            words_file: var("WORDS_FILE", "data/wordnet_alpha_words.json").into(),
            definitions_file: var("DEFINITIONS_FILE", "data/wordnet_definitions.json").into(),
            audio_dir: var("AUDIO_DIR", "data/audio").into(),
            audio_voice: var("AUDIO_VOICE", DEFAULT_VOICE),
            audio_extension: var("AUDIO_EXTENSION", "mp3"),
            static_dir: lookup("STATIC_DIR").map(PathBuf::from),
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Game settings derived from this configuration.
    #[must_use]
    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            word_count: self.words_per_game,
            session_ttl: self.session_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.backend, SessionBackend::Memory);
        assert_eq!(config.session_ttl, Duration::from_secs(3600));
        assert_eq!(config.words_per_game, 1000);
        assert_eq!(config.audio_extension, "mp3");
        assert_eq!(config.static_dir, None);
        assert_eq!(config.bind_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let result = config_from(&[("SESSION_BACKEND", "redis")]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_postgres_backend_reads_database_url() {
        let config = config_from(&[
            ("SESSION_BACKEND", "Postgres"),
            ("DATABASE_URL", "postgres://localhost/spellbee"),
        ])
        .unwrap();

        assert_eq!(
            config.backend,
            SessionBackend::Postgres {
                database_url: "postgres://localhost/spellbee".to_owned()
            }
        );
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = config_from(&[("SESSION_BACKEND", "sqlite")]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("SESSION_TTL_SECS", "0")]).is_err());
        assert!(config_from(&[("WORDS_PER_GAME", "-5")]).is_err());
    }

    #[test]
    fn test_game_settings_follow_config() {
        let config = config_from(&[("SESSION_TTL_SECS", "120"), ("WORDS_PER_GAME", "50")]).unwrap();

        let settings = config.game_settings();

        assert_eq!(settings.word_count, 50);
        assert_eq!(settings.session_ttl, Duration::from_secs(120));
    }
}
