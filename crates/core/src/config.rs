use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub advisor: AdvisorConfig,
    pub weather: WeatherConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct AdvisorConfig {
    pub provider: AdvisorProvider,
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timezone: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorProvider {
    Gemini,
    RuleBased,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub advisor_provider: Option<AdvisorProvider>,
    pub advisor_api_key: Option<String>,
    pub advisor_base_url: Option<String>,
    pub advisor_model: Option<String>,
    pub weather_base_url: Option<String>,
    pub server_port: Option<u16>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            advisor: AdvisorConfig {
                provider: AdvisorProvider::Gemini,
                api_key: None,
                base_url: "https://generativelanguage.googleapis.com".to_string(),
                model: "gemini-2.0-flash-exp".to_string(),
                timeout_secs: 10,
            },
            weather: WeatherConfig {
                base_url: "https://api.open-meteo.com".to_string(),
                timezone: "Asia/Seoul".to_string(),
                timeout_secs: 10,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8000,
                graceful_shutdown_secs: 15,
                cors_allowed_origins: vec![
                    "http://localhost:5173".to_string(),
                    "http://127.0.0.1:5173".to_string(),
                ],
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for AdvisorProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "gemini" => Ok(Self::Gemini),
            "rule_based" => Ok(Self::RuleBased),
            other => Err(ConfigError::Validation(format!(
                "unsupported advisor provider `{other}` (expected gemini|rule_based)"
            ))),
        }
    }
}

impl AdvisorProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::RuleBased => "rule_based",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AdvisorConfig {
    /// A provider is usable only with a non-blank credential; there is no
    /// built-in key.
    pub fn credential(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.expose_secret().trim().is_empty())
    }

    /// Provider actually in effect once credentials are taken into account.
    pub fn effective_provider(&self) -> AdvisorProvider {
        match self.provider {
            AdvisorProvider::Gemini if self.credential().is_some() => AdvisorProvider::Gemini,
            _ => AdvisorProvider::RuleBased,
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("lunchmate.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(advisor) = patch.advisor {
            if let Some(provider) = advisor.provider {
                self.advisor.provider = provider;
            }
            if let Some(api_key) = advisor.api_key {
                self.advisor.api_key = Some(secret_value(api_key));
            }
            if let Some(base_url) = advisor.base_url {
                self.advisor.base_url = base_url;
            }
            if let Some(model) = advisor.model {
                self.advisor.model = model;
            }
            if let Some(timeout_secs) = advisor.timeout_secs {
                self.advisor.timeout_secs = timeout_secs;
            }
        }

        if let Some(weather) = patch.weather {
            if let Some(base_url) = weather.base_url {
                self.weather.base_url = base_url;
            }
            if let Some(timezone) = weather.timezone {
                self.weather.timezone = timezone;
            }
            if let Some(timeout_secs) = weather.timeout_secs {
                self.weather.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
            if let Some(origins) = server.cors_allowed_origins {
                self.server.cors_allowed_origins = origins;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LUNCHMATE_ADVISOR_PROVIDER") {
            self.advisor.provider = value.parse()?;
        }
        let api_key = read_env("LUNCHMATE_ADVISOR_API_KEY").or_else(|| read_env("GEMINI_API_KEY"));
        if let Some(value) = api_key {
            self.advisor.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("LUNCHMATE_ADVISOR_BASE_URL") {
            self.advisor.base_url = value;
        }
        if let Some(value) = read_env("LUNCHMATE_ADVISOR_MODEL") {
            self.advisor.model = value;
        }
        if let Some(value) = read_env("LUNCHMATE_ADVISOR_TIMEOUT_SECS") {
            self.advisor.timeout_secs = parse_u64("LUNCHMATE_ADVISOR_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("LUNCHMATE_WEATHER_BASE_URL") {
            self.weather.base_url = value;
        }
        if let Some(value) = read_env("LUNCHMATE_WEATHER_TIMEZONE") {
            self.weather.timezone = value;
        }
        if let Some(value) = read_env("LUNCHMATE_WEATHER_TIMEOUT_SECS") {
            self.weather.timeout_secs = parse_u64("LUNCHMATE_WEATHER_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("LUNCHMATE_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("LUNCHMATE_SERVER_PORT") {
            self.server.port = parse_u16("LUNCHMATE_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("LUNCHMATE_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("LUNCHMATE_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("LUNCHMATE_SERVER_CORS_ALLOWED_ORIGINS") {
            self.server.cors_allowed_origins = value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToString::to_string)
                .collect();
        }

        let log_level =
            read_env("LUNCHMATE_LOGGING_LEVEL").or_else(|| read_env("LUNCHMATE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LUNCHMATE_LOGGING_FORMAT").or_else(|| read_env("LUNCHMATE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(provider) = overrides.advisor_provider {
            self.advisor.provider = provider;
        }
        if let Some(api_key) = overrides.advisor_api_key {
            self.advisor.api_key = Some(secret_value(api_key));
        }
        if let Some(base_url) = overrides.advisor_base_url {
            self.advisor.base_url = base_url;
        }
        if let Some(model) = overrides.advisor_model {
            self.advisor.model = model;
        }
        if let Some(base_url) = overrides.weather_base_url {
            self.weather.base_url = base_url;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_advisor(&self.advisor)?;
        validate_weather(&self.weather)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("lunchmate.toml"), PathBuf::from("config/lunchmate.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_http_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn validate_timeout(field: &str, timeout_secs: u64) -> Result<(), ConfigError> {
    if timeout_secs == 0 || timeout_secs > 300 {
        return Err(ConfigError::Validation(format!("{field} must be in range 1..=300")));
    }
    Ok(())
}

fn validate_advisor(advisor: &AdvisorConfig) -> Result<(), ConfigError> {
    validate_timeout("advisor.timeout_secs", advisor.timeout_secs)?;
    validate_http_url("advisor.base_url", advisor.base_url.trim())?;

    if advisor.model.trim().is_empty() {
        return Err(ConfigError::Validation("advisor.model must not be empty".to_string()));
    }

    Ok(())
}

fn validate_weather(weather: &WeatherConfig) -> Result<(), ConfigError> {
    validate_timeout("weather.timeout_secs", weather.timeout_secs)?;
    validate_http_url("weather.base_url", weather.base_url.trim())?;

    if weather.timezone.trim().is_empty() {
        return Err(ConfigError::Validation("weather.timezone must not be empty".to_string()));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    for origin in &server.cors_allowed_origins {
        validate_http_url("server.cors_allowed_origins", origin)?;
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    advisor: Option<AdvisorPatch>,
    weather: Option<WeatherPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct AdvisorPatch {
    provider: Option<AdvisorProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherPatch {
    base_url: Option<String>,
    timezone: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
    cors_allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AdvisorProvider, AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    const ADVISOR_KEY_VARS: [&str; 2] = ["LUNCHMATE_ADVISOR_API_KEY", "GEMINI_API_KEY"];

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_select_rule_based_advisor_without_credential() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ADVISOR_KEY_VARS);

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.advisor.provider == AdvisorProvider::Gemini, "gemini is the default")?;
        ensure(config.advisor.credential().is_none(), "no credential is bundled")?;
        ensure(
            config.advisor.effective_provider() == AdvisorProvider::RuleBased,
            "missing credential means the advisor is unavailable",
        )?;
        ensure(config.advisor.timeout_secs == 10, "advisor timeout defaults to 10 seconds")?;
        ensure(config.server.port == 8000, "server port defaults to 8000")
    }

    #[test]
    fn gemini_alias_env_supplies_the_credential() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ADVISOR_KEY_VARS);
        env::set_var("GEMINI_API_KEY", "alias-key");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            ensure(
                config.advisor.credential().map(|key| key.expose_secret() == "alias-key")
                    == Some(true),
                "alias env var should populate the advisor key",
            )?;
            ensure(
                config.advisor.effective_provider() == AdvisorProvider::Gemini,
                "configured credential enables gemini",
            )
        })();

        clear_vars(&ADVISOR_KEY_VARS);
        result
    }

    #[test]
    fn blank_credential_counts_as_missing() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ADVISOR_KEY_VARS);

        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                advisor_api_key: Some("   ".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(
            config.advisor.effective_provider() == AdvisorProvider::RuleBased,
            "blank credential must not enable the advisor",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ADVISOR_KEY_VARS);
        env::set_var("TEST_LUNCHMATE_GEMINI_KEY", "from-interpolation");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("lunchmate.toml");
            fs::write(
                &path,
                r#"
[advisor]
api_key = "${TEST_LUNCHMATE_GEMINI_KEY}"
model = "gemini-1.5-flash"

[weather]
timezone = "Asia/Tokyo"

[server]
cors_allowed_origins = ["https://lunch.example.com"]
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.advisor.api_key.as_ref().map(|key| key.expose_secret().to_string())
                    == Some("from-interpolation".to_string()),
                "api key should be interpolated from the environment",
            )?;
            ensure(config.advisor.model == "gemini-1.5-flash", "model should come from file")?;
            ensure(config.weather.timezone == "Asia/Tokyo", "timezone should come from file")?;
            ensure(
                config.server.cors_allowed_origins == vec!["https://lunch.example.com".to_string()],
                "cors origins should come from file",
            )
        })();

        clear_vars(&["TEST_LUNCHMATE_GEMINI_KEY"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        env::remove_var("TEST_LUNCHMATE_UNSET_VAR");

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("lunchmate.toml");
        fs::write(&path, "[advisor]\napi_key = \"${TEST_LUNCHMATE_UNSET_VAR}\"\n")
            .map_err(|err| err.to_string())?;

        let error =
            match AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
            {
                Ok(_) => return Err("expected interpolation failure".to_string()),
                Err(error) => error,
            };
        ensure(
            matches!(error, ConfigError::MissingEnvInterpolation { ref var } if var == "TEST_LUNCHMATE_UNSET_VAR"),
            "error should name the missing variable",
        )
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        env::set_var("LUNCHMATE_ADVISOR_MODEL", "model-from-env");
        env::set_var("LUNCHMATE_SERVER_PORT", "9100");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("lunchmate.toml");
            fs::write(
                &path,
                r#"
[advisor]
model = "model-from-file"

[server]
port = 9000

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    server_port: Some(9200),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.advisor.model == "model-from-env", "env model should beat file")?;
            ensure(config.server.port == 9200, "override port should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")
        })();

        clear_vars(&["LUNCHMATE_ADVISOR_MODEL", "LUNCHMATE_SERVER_PORT"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        env::set_var("LUNCHMATE_LOG_LEVEL", "warn");
        env::set_var("LUNCHMATE_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "json logging format should be set from env var",
            )
        })();

        clear_vars(&["LUNCHMATE_LOG_LEVEL", "LUNCHMATE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn invalid_numeric_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        env::set_var("LUNCHMATE_ADVISOR_TIMEOUT_SECS", "soon");

        let result = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => Err("expected invalid override failure".to_string()),
            Err(error) => ensure(
                matches!(error, ConfigError::InvalidEnvOverride { ref key, .. } if key == "LUNCHMATE_ADVISOR_TIMEOUT_SECS"),
                "error should name the offending variable",
            ),
        };

        clear_vars(&["LUNCHMATE_ADVISOR_TIMEOUT_SECS"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        env::set_var("LUNCHMATE_WEATHER_TIMEOUT_SECS", "0");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("weather.timeout_secs")
            );
            ensure(has_message, "validation failure should mention weather.timeout_secs")
        })();

        clear_vars(&["LUNCHMATE_WEATHER_TIMEOUT_SECS"]);
        result
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ADVISOR_KEY_VARS);
        env::set_var("LUNCHMATE_ADVISOR_API_KEY", "gemini-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(
                !debug.contains("gemini-secret-value"),
                "debug output should not contain the advisor key",
            )?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )
        })();

        clear_vars(&ADVISOR_KEY_VARS);
        result
    }

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!("Gemini".parse::<AdvisorProvider>().ok(), Some(AdvisorProvider::Gemini));
        assert_eq!("rule-based".parse::<AdvisorProvider>().ok(), Some(AdvisorProvider::RuleBased));
        assert!("openai".parse::<AdvisorProvider>().is_err());
        assert_eq!(AdvisorProvider::RuleBased.as_str(), "rule_based");
        let round_trip = AdvisorProvider::Gemini.as_str().parse::<AdvisorProvider>();
        assert_eq!(round_trip.ok(), Some(AdvisorProvider::Gemini));
    }
}
