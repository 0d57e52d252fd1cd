//! Configuration management for meetsurvey.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "meetsurvey";

/// Default database file name for the local store.
const DATABASE_FILE_NAME: &str = "contacts.db";

/// Environment variables the hosted deployment already sets for the store.
const LEGACY_STORE_URL_VAR: &str = "SUPABASE_URL";
const LEGACY_STORE_KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. `SUPABASE_URL` / `SUPABASE_ANON_KEY`
/// 2. Environment variables prefixed with `MEETSURVEY_`, nested with `__`
///    (e.g. `MEETSURVEY_STORE__API_KEY`)
/// 3. TOML config file at `~/.config/meetsurvey/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Contact store configuration.
    pub store: StoreConfig,
    /// Page branding.
    pub branding: BrandingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: String,
    /// Externally reachable base URL, used when printing survey links.
    pub public_url: String,
}

/// Which contact store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// PostgREST-compatible HTTP API.
    #[default]
    Rest,
    /// Local `SQLite` database.
    Sqlite,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rest => write!(f, "rest"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Contact store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend selection.
    pub backend: StoreBackend,
    /// Base URL of the REST API (without `/rest/v1`).
    pub url: String,
    /// API key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Name of the contacts table.
    pub table: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Path to the local database file.
    /// Defaults to `~/.local/share/meetsurvey/contacts.db`
    pub database_path: Option<PathBuf>,
}

/// How the page header draws the logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// An `<img>` tag pointing at `logo_url`.
    #[default]
    StaticImage,
    /// SVG markup read from `logo_svg_path`, embedded in the page.
    InlineSvg,
}

/// Page branding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Company shown in the title and logo alt text.
    pub company_name: String,
    /// Registered company name shown in the footer.
    pub legal_name: String,
    /// The person attendees met with.
    pub host_name: String,
    /// Browser tab title.
    pub page_title: String,
    /// Logo header strategy.
    pub header_style: HeaderStyle,
    /// Logo image URL.
    pub logo_url: String,
    /// SVG file for [`HeaderStyle::InlineSvg`].
    pub logo_svg_path: Option<PathBuf>,
    /// Company website, linked after attendee submissions.
    pub website_url: String,
    /// Support address shown on errors and in the footer.
    pub support_email: String,
    /// Phone number shown in the footer.
    pub phone: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
            public_url: "http://localhost:8501".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Rest,
            url: String::new(),
            api_key: String::new(),
            table: "contacts".to_string(),
            timeout_secs: 10,
            database_path: None, // Resolved to default at runtime
        }
    }
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            company_name: "Metro Point Technology".to_string(),
            legal_name: "Metro Point Technology LLC".to_string(),
            host_name: "Patrick".to_string(),
            page_title: "Meeting Feedback | Metro Point Technology".to_string(),
            header_style: HeaderStyle::StaticImage,
            logo_url: "https://metropointtech.com/logo-animated.svg".to_string(),
            logo_svg_path: None,
            website_url: "https://metropointtech.com".to_string(),
            support_email: "support@metropointtech.com".to_string(),
            phone: "(239) 600-8159".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config: Config = Self::figment(config_path).extract()?;
        Ok(config)
    }

    /// Load and validate, for commands that are about to talk to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the result is invalid.
    pub fn load_validated(config_path: Option<PathBuf>) -> Result<Self> {
        let config = Self::load_from(config_path)?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_path: Option<PathBuf>) -> Figment {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("MEETSURVEY_").split("__"))
            .merge(
                Env::raw()
                    .only(&[LEGACY_STORE_URL_VAR, LEGACY_STORE_KEY_VAR])
                    .map(|key| {
                        if key.as_str().eq_ignore_ascii_case(LEGACY_STORE_URL_VAR) {
                            "store.url".into()
                        } else {
                            "store.api_key".into()
                        }
                    }),
            )
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("server.bind is not a socket address: {}", self.server.bind),
            });
        }

        if self.store.backend == StoreBackend::Rest {
            if self.store.url.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "store.url must be set for the rest backend (or SUPABASE_URL)"
                        .to_string(),
                });
            }
            if self.store.api_key.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message:
                        "store.api_key must be set for the rest backend (or SUPABASE_ANON_KEY)"
                            .to_string(),
                });
            }
        }

        if self.store.table.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "store.table must not be empty".to_string(),
            });
        }

        if self.store.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "store.timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.branding.header_style == HeaderStyle::InlineSvg
            && self.branding.logo_svg_path.is_none()
        {
            return Err(Error::ConfigValidation {
                message: "branding.logo_svg_path is required for the inline_svg header style"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Get the local database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.store
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the store request timeout as a Duration.
    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_in_jail(path: &str) -> figment::error::Result<Config> {
        Config::load_from(Some(PathBuf::from(path))).map_err(|e| e.to_string().into())
    }

    fn rest_config() -> Config {
        let mut config = Config::default();
        config.store.url = "https://example.supabase.co".to_string();
        config.store.api_key = "anon-key".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.store.backend, StoreBackend::Rest);
        assert_eq!(config.store.table, "contacts");
        assert_eq!(config.branding.header_style, HeaderStyle::StaticImage);
        assert_eq!(config.server.bind, "127.0.0.1:8501");
    }

    #[test]
    fn test_default_branding_config() {
        let branding = BrandingConfig::default();

        assert_eq!(branding.host_name, "Patrick");
        assert_eq!(branding.legal_name, "Metro Point Technology LLC");
        assert!(branding.logo_svg_path.is_none());
        assert!(branding.support_email.contains('@'));
    }

    #[test]
    fn test_validate_valid_rest_config() {
        assert!(rest_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rest_requires_url() {
        let mut config = rest_config();
        config.store.url = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("store.url"));
    }

    #[test]
    fn test_validate_rest_requires_api_key() {
        let mut config = rest_config();
        config.store.api_key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("store.api_key"));
    }

    #[test]
    fn test_validate_sqlite_needs_no_url() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Sqlite;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = rest_config();
        config.store.timeout_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeout_secs"));
    }

    #[test]
    fn test_validate_bad_bind() {
        let mut config = rest_config();
        config.server.bind = "localhost".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.bind"));
    }

    #[test]
    fn test_validate_inline_svg_needs_path() {
        let mut config = rest_config();
        config.branding.header_style = HeaderStyle::InlineSvg;
        assert!(config.validate().is_err());

        config.branding.logo_svg_path = Some(PathBuf::from("/srv/logo.svg"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config.database_path().to_string_lossy().contains("contacts.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.store.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_store_timeout() {
        let config = Config::default();
        assert_eq!(config.store_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("meetsurvey"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|_jail| {
            let config = load_in_jail("/nonexistent/config.toml")?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "survey.toml",
                r#"
                [store]
                backend = "sqlite"
                timeout_secs = 3

                [branding]
                host_name = "Morgan"
                header_style = "inline_svg"
                logo_svg_path = "logo.svg"
                "#,
            )?;

            let config = load_in_jail("survey.toml")?;
            assert_eq!(config.store.backend, StoreBackend::Sqlite);
            assert_eq!(config.store.timeout_secs, 3);
            assert_eq!(config.branding.host_name, "Morgan");
            assert_eq!(config.branding.header_style, HeaderStyle::InlineSvg);
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("survey.toml", "[store]\ntable = \"people\"\n")?;
            jail.set_env("MEETSURVEY_STORE__TABLE", "crm_contacts");
            jail.set_env("MEETSURVEY_SERVER__BIND", "0.0.0.0:9000");

            let config = load_in_jail("survey.toml")?;
            assert_eq!(config.store.table, "crm_contacts");
            assert_eq!(config.server.bind, "0.0.0.0:9000");
            Ok(())
        });
    }

    #[test]
    fn test_legacy_store_env_vars() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SUPABASE_URL", "https://abc.supabase.co");
            jail.set_env("SUPABASE_ANON_KEY", "anon");

            let config = load_in_jail("missing.toml")?;
            assert_eq!(config.store.url, "https://abc.supabase.co");
            assert_eq!(config.store.api_key, "anon");
            assert!(config.validate().is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_store_backend_display() {
        assert_eq!(StoreBackend::Rest.to_string(), "rest");
        assert_eq!(StoreBackend::Sqlite.to_string(), "sqlite");
    }

    #[test]
    fn test_header_style_deserialize() {
        let style: HeaderStyle = serde_json::from_str("\"inline_svg\"").unwrap();
        assert_eq!(style, HeaderStyle::InlineSvg);
    }

    #[test]
    fn test_config_clone() {
        let config = rest_config();
        assert_eq!(config.clone(), config);
    }
}
