use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use leetdraw_core::config::{AppConfig, LoadOptions, RuntimeProfile};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let options = LoadOptions { profile: RuntimeProfile::Cli, ..LoadOptions::default() };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let bot_token = redact_token(config.discord.bot_token.expose_secret());
    let entries = [
        ("discord.bot_token", bot_token, "LEETDRAW_DISCORD_BOT_TOKEN"),
        ("discord.trigger", config.discord.trigger.clone(), "LEETDRAW_DISCORD_TRIGGER"),
        (
            "discord.api_base_url",
            config.discord.api_base_url.clone(),
            "LEETDRAW_DISCORD_API_BASE_URL",
        ),
        (
            "leetcode.catalog_url",
            config.leetcode.catalog_url.clone(),
            "LEETDRAW_LEETCODE_CATALOG_URL",
        ),
        (
            "leetcode.graphql_url",
            config.leetcode.graphql_url.clone(),
            "LEETDRAW_LEETCODE_GRAPHQL_URL",
        ),
        (
            "leetcode.problem_url_template",
            config.leetcode.problem_url_template.clone(),
            "LEETDRAW_LEETCODE_PROBLEM_URL_TEMPLATE",
        ),
        (
            "leetcode.timeout_secs",
            config.leetcode.timeout_secs.to_string(),
            "LEETDRAW_LEETCODE_TIMEOUT_SECS",
        ),
        ("leetcode.user_agent", config.leetcode.user_agent.clone(), "LEETDRAW_LEETCODE_USER_AGENT"),
        ("server.bind_address", config.server.bind_address.clone(), "LEETDRAW_SERVER_BIND_ADDRESS"),
        (
            "server.health_check_port",
            config.server.health_check_port.to_string(),
            "LEETDRAW_SERVER_HEALTH_CHECK_PORT",
        ),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            "LEETDRAW_SERVER_GRACEFUL_SHUTDOWN_SECS",
        ),
        ("logging.level", config.logging.level.clone(), "LEETDRAW_LOGGING_LEVEL"),
        ("logging.format", format!("{:?}", config.logging.format), "LEETDRAW_LOGGING_FORMAT"),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, value, env_key) in entries {
        lines.push(render_line(key_path, &value, source(key_path, env_key)));
    }
    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    ["leetdraw.toml", "config/leetdraw.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }
    if let Some(alias) = legacy_alias(env_key) {
        if env::var_os(alias).is_some() {
            return format!("env ({alias})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn legacy_alias(env_key: &str) -> Option<&'static str> {
    match env_key {
        "LEETDRAW_LOGGING_LEVEL" => Some("LEETDRAW_LOG_LEVEL"),
        "LEETDRAW_LOGGING_FORMAT" => Some("LEETDRAW_LOG_FORMAT"),
        _ => None,
    }
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps the first token segment (the encoded bot id) and hides the rest.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('.') {
        return format!("{prefix}.***");
    }

    "<redacted>".to_string()
}
