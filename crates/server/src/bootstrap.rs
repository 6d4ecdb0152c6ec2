use std::{sync::Arc, time::Duration};

use leetdraw_core::{
    config::{AppConfig, ConfigError, LoadOptions},
    QuestionSelector,
};
use leetdraw_discord::{
    draw_dispatcher,
    rest::{DeliveryError, DiscordRestSink},
    GatewayRunner, GatewayTransport, NoopGatewayTransport, ReconnectPolicy,
};
use leetdraw_leetcode::{ClientError, LeetCodeClient};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub gateway_runner: Arc<GatewayRunner>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("leetcode client setup failed: {0}")]
    LeetCodeClient(#[source] ClientError),
    #[error("discord client setup failed: {0}")]
    DiscordClient(#[source] DeliveryError),
}

/// Loads and validates the bot configuration; the first step of every startup.
pub fn load_config(options: LoadOptions) -> Result<AppConfig, BootstrapError> {
    Ok(AppConfig::load(options)?)
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    bootstrap_with_transport(config, Arc::new(NoopGatewayTransport)).await
}

/// Wires the question pipeline behind the given gateway transport.
pub async fn bootstrap_with_transport(
    config: AppConfig,
    transport: Arc<dyn GatewayTransport>,
) -> Result<Application, BootstrapError> {
    let client =
        Arc::new(LeetCodeClient::new(&config.leetcode).map_err(BootstrapError::LeetCodeClient)?);
    info!(
        event_name = "system.bootstrap.leetcode_client_ready",
        correlation_id = "bootstrap",
        catalog_url = %client.catalog_url(),
        graphql_url = %client.graphql_url(),
        "leetcode client constructed"
    );

    let selector = QuestionSelector::new(client)
        .with_url_template(config.leetcode.problem_url_template.clone());
    let dispatcher = draw_dispatcher(selector, config.discord.trigger.clone());

    let sink = DiscordRestSink::new(
        config.discord.api_base_url.clone(),
        config.discord.bot_token.clone(),
        Duration::from_secs(config.leetcode.timeout_secs),
    )
    .map_err(BootstrapError::DiscordClient)?;

    let gateway_runner = Arc::new(GatewayRunner::new(
        transport,
        dispatcher,
        Arc::new(sink),
        ReconnectPolicy::default(),
    ));
    info!(
        event_name = "system.bootstrap.gateway_ready",
        correlation_id = "bootstrap",
        transport_mode = gateway_runner.transport_mode(),
        trigger = %config.discord.trigger,
        "discord gateway runner constructed"
    );

    Ok(Application { config, gateway_runner })
}
