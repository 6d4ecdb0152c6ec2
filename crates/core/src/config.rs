use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::question::{DEFAULT_PROBLEM_URL_TEMPLATE, SLUG_PLACEHOLDER};

pub const DEFAULT_TRIGGER: &str = "抽";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub discord: DiscordConfig,
    pub leetcode: LeetCodeConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DiscordConfig {
    pub bot_token: SecretString,
    pub trigger: String,
    pub api_base_url: String,
}

#[derive(Clone, Debug)]
pub struct LeetCodeConfig {
    pub catalog_url: String,
    pub graphql_url: String,
    pub problem_url_template: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub health_check_port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Which surface is loading the config. The operator CLI can draw questions without a bot token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuntimeProfile {
    #[default]
    Bot,
    Cli,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub discord_bot_token: Option<String>,
    pub discord_trigger: Option<String>,
    pub leetcode_catalog_url: Option<String>,
    pub leetcode_graphql_url: Option<String>,
    pub leetcode_timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub profile: RuntimeProfile,
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
            discord: DiscordConfig {
                bot_token: String::new().into(),
                trigger: DEFAULT_TRIGGER.to_string(),
                api_base_url: "https://discord.com/api/v10".to_string(),
            },
            leetcode: LeetCodeConfig {
                catalog_url: "https://leetcode.com/api/problems/all/".to_string(),
                graphql_url: "https://leetcode.com/graphql".to_string(),
                problem_url_template: DEFAULT_PROBLEM_URL_TEMPLATE.to_string(),
                timeout_secs: 30,
                user_agent: concat!("leetdraw/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                health_check_port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
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

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("leetdraw.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate_for(options.profile)?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(discord) = patch.discord {
            if let Some(bot_token_value) = discord.bot_token {
                self.discord.bot_token = secret_value(bot_token_value);
            }
            if let Some(trigger) = discord.trigger {
                self.discord.trigger = trigger;
            }
            if let Some(api_base_url) = discord.api_base_url {
                self.discord.api_base_url = api_base_url;
            }
        }

        if let Some(leetcode) = patch.leetcode {
            if let Some(catalog_url) = leetcode.catalog_url {
                self.leetcode.catalog_url = catalog_url;
            }
            if let Some(graphql_url) = leetcode.graphql_url {
                self.leetcode.graphql_url = graphql_url;
            }
            if let Some(problem_url_template) = leetcode.problem_url_template {
                self.leetcode.problem_url_template = problem_url_template;
            }
            if let Some(timeout_secs) = leetcode.timeout_secs {
                self.leetcode.timeout_secs = timeout_secs;
            }
            if let Some(user_agent) = leetcode.user_agent {
                self.leetcode.user_agent = user_agent;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(health_check_port) = server.health_check_port {
                self.server.health_check_port = health_check_port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
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
        if let Some(value) = read_env("LEETDRAW_DISCORD_BOT_TOKEN") {
            self.discord.bot_token = secret_value(value);
        }
        if let Some(value) = read_env("LEETDRAW_DISCORD_TRIGGER") {
            self.discord.trigger = value;
        }
        if let Some(value) = read_env("LEETDRAW_DISCORD_API_BASE_URL") {
            self.discord.api_base_url = value;
        }

        if let Some(value) = read_env("LEETDRAW_LEETCODE_CATALOG_URL") {
            self.leetcode.catalog_url = value;
        }
        if let Some(value) = read_env("LEETDRAW_LEETCODE_GRAPHQL_URL") {
            self.leetcode.graphql_url = value;
        }
        if let Some(value) = read_env("LEETDRAW_LEETCODE_PROBLEM_URL_TEMPLATE") {
            self.leetcode.problem_url_template = value;
        }
        if let Some(value) = read_env("LEETDRAW_LEETCODE_TIMEOUT_SECS") {
            self.leetcode.timeout_secs = parse_u64("LEETDRAW_LEETCODE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("LEETDRAW_LEETCODE_USER_AGENT") {
            self.leetcode.user_agent = value;
        }

        if let Some(value) = read_env("LEETDRAW_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("LEETDRAW_SERVER_HEALTH_CHECK_PORT") {
            self.server.health_check_port =
                parse_u16("LEETDRAW_SERVER_HEALTH_CHECK_PORT", &value)?;
        }
        if let Some(value) = read_env("LEETDRAW_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("LEETDRAW_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("LEETDRAW_LOGGING_LEVEL").or_else(|| read_env("LEETDRAW_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LEETDRAW_LOGGING_FORMAT").or_else(|| read_env("LEETDRAW_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(bot_token) = overrides.discord_bot_token {
            self.discord.bot_token = secret_value(bot_token);
        }
        if let Some(trigger) = overrides.discord_trigger {
            self.discord.trigger = trigger;
        }
        if let Some(catalog_url) = overrides.leetcode_catalog_url {
            self.leetcode.catalog_url = catalog_url;
        }
        if let Some(graphql_url) = overrides.leetcode_graphql_url {
            self.leetcode.graphql_url = graphql_url;
        }
        if let Some(timeout_secs) = overrides.leetcode_timeout_secs {
            self.leetcode.timeout_secs = timeout_secs;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_for(RuntimeProfile::Bot)
    }

    pub fn validate_for(&self, profile: RuntimeProfile) -> Result<(), ConfigError> {
        if profile == RuntimeProfile::Bot {
            validate_discord(&self.discord)?;
        }
        validate_leetcode(&self.leetcode)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("leetdraw.toml"), PathBuf::from("config/leetdraw.toml")]
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

fn validate_discord(discord: &DiscordConfig) -> Result<(), ConfigError> {
    let bot_token = discord.bot_token.expose_secret();
    if bot_token.trim().is_empty() {
        return Err(ConfigError::Validation(
            "discord.bot_token is required. Get it from https://discord.com/developers/applications > Your App > Bot > Reset Token".to_string()
        ));
    }
    if bot_token.chars().any(char::is_whitespace) {
        let hint = if bot_token.starts_with("Bot ") {
            " (hint: store the raw token without the `Bot ` header prefix)"
        } else {
            ""
        };
        return Err(ConfigError::Validation(format!(
            "discord.bot_token must not contain whitespace{hint}"
        )));
    }

    if discord.trigger.trim().is_empty() {
        return Err(ConfigError::Validation("discord.trigger must not be empty".to_string()));
    }

    validate_http_url("discord.api_base_url", &discord.api_base_url)
}

fn validate_leetcode(leetcode: &LeetCodeConfig) -> Result<(), ConfigError> {
    validate_http_url("leetcode.catalog_url", &leetcode.catalog_url)?;
    validate_http_url("leetcode.graphql_url", &leetcode.graphql_url)?;
    validate_http_url("leetcode.problem_url_template", &leetcode.problem_url_template)?;

    if !leetcode.problem_url_template.contains(SLUG_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "leetcode.problem_url_template must contain the `{SLUG_PLACEHOLDER}` placeholder"
        )));
    }

    if leetcode.timeout_secs == 0 || leetcode.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "leetcode.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if leetcode.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "leetcode.user_agent must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{key} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.health_check_port == 0 {
        return Err(ConfigError::Validation(
            "server.health_check_port must be greater than zero".to_string(),
        ));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
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
    discord: Option<DiscordPatch>,
    leetcode: Option<LeetCodePatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DiscordPatch {
    bot_token: Option<String>,
    trigger: Option<String>,
    api_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LeetCodePatch {
    catalog_url: Option<String>,
    graphql_url: Option<String>,
    problem_url_template: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    health_check_port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
