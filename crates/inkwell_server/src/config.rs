//! Server configuration.
//!
//! Settings come from CLI flags or environment variables (a `.env` file is
//! loaded first by `main`). `ServerConfig::into_settings` validates them
//! before anything binds.

use actix_web::cookie::Key;
use clap::Parser;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Minimum session secret length accepted by the cookie key derivation.
pub const SECRET_KEY_MIN_LEN: usize = 32;

/// inkwell HTTP server
#[derive(Parser, Debug, Clone)]
#[command(name = "inkwell-server")]
#[command(about = "Multi-user note-taking backend")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "INKWELL_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// SQLite database file
    #[arg(long, env = "INKWELL_DATABASE", default_value = "inkwell.sqlite3")]
    pub database: PathBuf,

    /// Session cookie secret (at least 32 bytes)
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Generate a throwaway session key when SECRET_KEY is unset
    #[arg(long, env = "INKWELL_SESSION_ALLOW_EPHEMERAL", default_value = "false")]
    pub allow_ephemeral_key: bool,

    /// Mark the session cookie `Secure` (and `SameSite=None`)
    #[arg(long, env = "INKWELL_COOKIE_SECURE", default_value = "false")]
    pub cookie_secure: bool,

    /// Origin allowed to call the API with credentials
    #[arg(long, env = "FRONTEND_ORIGIN", default_value = "http://localhost:5173")]
    pub frontend_origin: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Absolute directory for rolling log files; stderr when unset
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<String>,
}

/// Validated settings used to build the server.
#[derive(Clone)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub database: PathBuf,
    pub session_key: Key,
    pub cookie_secure: bool,
    pub frontend_origin: String,
}

/// Invalid server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingSecretKey,
    SecretKeyTooShort { min: usize, actual: usize },
    InvalidOrigin(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSecretKey => write!(
                f,
                "SECRET_KEY is required (set INKWELL_SESSION_ALLOW_EPHEMERAL=true for a throwaway key)"
            ),
            Self::SecretKeyTooShort { min, actual } => write!(
                f,
                "SECRET_KEY must be at least {min} bytes, got {actual}"
            ),
            Self::InvalidOrigin(origin) => write!(
                f,
                "FRONTEND_ORIGIN `{origin}` must be an http(s) origin without a path"
            ),
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Validates the raw configuration.
    ///
    /// # Errors
    /// - Secret missing outside debug builds without the ephemeral opt-in.
    /// - Secret shorter than [`SECRET_KEY_MIN_LEN`] bytes.
    /// - Frontend origin is not a bare `http(s)://host[:port]`.
    pub fn into_settings(self) -> Result<ServerSettings, ConfigError> {
        let session_key = session_key(
            self.secret_key.as_deref(),
            self.allow_ephemeral_key || cfg!(debug_assertions),
        )?;
        let frontend_origin = validate_origin(&self.frontend_origin)?;

        Ok(ServerSettings {
            bind: self.bind,
            database: self.database,
            session_key,
            cookie_secure: self.cookie_secure,
            frontend_origin,
        })
    }
}

fn session_key(secret: Option<&str>, allow_ephemeral: bool) -> Result<Key, ConfigError> {
    match secret {
        Some(secret) if secret.len() >= SECRET_KEY_MIN_LEN => Ok(Key::derive_from(secret.as_bytes())),
        Some(secret) => Err(ConfigError::SecretKeyTooShort {
            min: SECRET_KEY_MIN_LEN,
            actual: secret.len(),
        }),
        None if allow_ephemeral => {
            warn!("event=session_key module=config status=ephemeral sessions_survive_restart=false");
            Ok(Key::generate())
        }
        None => Err(ConfigError::MissingSecretKey),
    }
}

fn validate_origin(origin: &str) -> Result<String, ConfigError> {
    let trimmed = origin.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains('/') => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidOrigin(origin.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        let mut argv = vec!["inkwell-server"];
        argv.extend_from_slice(args);
        ServerConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = parse(&["--secret-key", "too-short"]).into_settings().err();
        assert_eq!(
            err,
            Some(ConfigError::SecretKeyTooShort { min: 32, actual: 9 })
        );
    }

    #[test]
    fn long_secret_is_accepted() {
        let settings = parse(&[
            "--secret-key",
            "0123456789abcdef0123456789abcdef",
            "--bind",
            "0.0.0.0:8080",
        ])
        .into_settings()
        .unwrap();
        assert_eq!(settings.bind.port(), 8080);
        assert!(!settings.cookie_secure);
    }

    #[test]
    fn missing_secret_needs_opt_in() {
        assert_eq!(
            session_key(None, false).err(),
            Some(ConfigError::MissingSecretKey)
        );
        assert!(session_key(None, true).is_ok());
    }

    #[test]
    fn origins_are_normalized_and_checked() {
        assert_eq!(
            validate_origin("http://localhost:5173/").unwrap(),
            "http://localhost:5173"
        );
        assert!(validate_origin("localhost:5173").is_err());
        assert!(validate_origin("https://app.example.com/path").is_err());
    }
}
