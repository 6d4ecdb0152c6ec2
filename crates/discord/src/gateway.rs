use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tokio::{
    sync::RwLock,
    task::{JoinError, JoinSet},
};
use tracing::{debug, info, warn};

use crate::{
    events::{EventContext, EventDispatcher, GatewayEnvelope, GatewayEvent, HandlerResult},
    rest::{MessageSink, NoopMessageSink},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("gateway failed to connect: {0}")]
    Connect(String),
    #[error("gateway read failed: {0}")]
    Receive(String),
    #[error("gateway disconnect failed: {0}")]
    Disconnect(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;
    async fn next_event(&self) -> Result<Option<GatewayEnvelope>, TransportError>;
    async fn disconnect(&self) -> Result<(), TransportError>;

    /// Short label reported by the health endpoint.
    fn mode(&self) -> &'static str {
        "gateway"
    }
}

#[derive(Default)]
pub struct NoopGatewayTransport;

#[async_trait]
impl GatewayTransport for NoopGatewayTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_event(&self) -> Result<Option<GatewayEnvelope>, TransportError> {
        Ok(None)
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn mode(&self) -> &'static str {
        "noop"
    }
}

/// Pumps gateway events into the dispatcher and delivers the replies.
///
/// Each envelope is handled on its own task. When the stream closes the runner waits for
/// in-flight handlers before disconnecting.
pub struct GatewayRunner {
    transport: Arc<dyn GatewayTransport>,
    dispatcher: Arc<EventDispatcher>,
    sink: Arc<dyn MessageSink>,
    reconnect_policy: ReconnectPolicy,
    bot_user_id: RwLock<Option<String>>,
    connected: AtomicBool,
}

impl Default for GatewayRunner {
    fn default() -> Self {
        Self::new(
            Arc::new(NoopGatewayTransport),
            EventDispatcher::default(),
            Arc::new(NoopMessageSink),
            ReconnectPolicy::default(),
        )
    }
}

impl GatewayRunner {
    pub fn new(
        transport: Arc<dyn GatewayTransport>,
        dispatcher: EventDispatcher,
        sink: Arc<dyn MessageSink>,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self {
            transport,
            dispatcher: Arc::new(dispatcher),
            sink,
            reconnect_policy,
            bot_user_id: RwLock::new(None),
            connected: AtomicBool::new(false),
        }
    }

    pub fn transport_mode(&self) -> &'static str {
        self.transport.mode()
    }

    pub fn is_noop_transport(&self) -> bool {
        self.transport_mode() == "noop"
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub async fn bot_user_id(&self) -> Option<String> {
        self.bot_user_id.read().await.clone()
    }

    pub async fn start(&self) -> Result<()> {
        for attempt in 0..=self.reconnect_policy.max_retries {
            let outcome = self.connect_and_pump(attempt).await;
            self.connected.store(false, Ordering::SeqCst);

            match outcome {
                Ok(()) => return Ok(()),
                Err(transport_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %transport_error,
                        "discord gateway transport failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "discord gateway retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn connect_and_pump(&self, attempt: u32) -> Result<(), TransportError> {
        info!(attempt, mode = self.transport_mode(), "opening discord gateway connection");
        self.transport.connect().await?;
        self.connected.store(true, Ordering::SeqCst);
        info!(attempt, "discord gateway connected");

        let mut in_flight = JoinSet::new();
        let pumped = self.pump(attempt, &mut in_flight).await;
        while let Some(result) = in_flight.join_next().await {
            log_handler_outcome(result);
        }
        pumped?;

        self.transport.disconnect().await
    }

    async fn pump(&self, attempt: u32, in_flight: &mut JoinSet<()>) -> Result<(), TransportError> {
        loop {
            reap_finished(in_flight);
            let Some(envelope) = self.transport.next_event().await? else {
                info!(attempt, "discord gateway stream closed");
                return Ok(());
            };
            let correlation_id = envelope.correlation_id();

            info!(
                event_name = "ingress.discord.event_received",
                event_type = ?envelope.event.event_type(),
                sequence = envelope.sequence,
                correlation_id = %correlation_id,
                "received discord gateway event"
            );

            if let GatewayEvent::Ready(ready) = &envelope.event {
                info!(
                    event_name = "ingress.discord.ready",
                    session_id = %ready.session_id,
                    bot_user_id = %ready.bot_user_id,
                    "discord gateway session ready"
                );
                *self.bot_user_id.write().await = Some(ready.bot_user_id.clone());
            }

            let context =
                EventContext { correlation_id, bot_user_id: self.bot_user_id.read().await.clone() };
            let dispatcher = Arc::clone(&self.dispatcher);
            let sink = Arc::clone(&self.sink);
            in_flight.spawn(async move {
                handle_envelope(dispatcher, sink, envelope, context).await;
            });
        }
    }
}

/// Collects handler tasks that already finished so the set only holds in-flight work.
fn reap_finished(in_flight: &mut JoinSet<()>) {
    while let Some(result) = in_flight.try_join_next() {
        log_handler_outcome(result);
    }
}

fn log_handler_outcome(result: Result<(), JoinError>) {
    if let Err(error) = result {
        warn!(
            event_name = "ingress.discord.handler_aborted",
            panicked = error.is_panic(),
            error = %error,
            "event handler task did not complete"
        );
    }
}

async fn handle_envelope(
    dispatcher: Arc<EventDispatcher>,
    sink: Arc<dyn MessageSink>,
    envelope: GatewayEnvelope,
    context: EventContext,
) {
    let outbound = match dispatcher.dispatch(&envelope, &context).await {
        Ok(HandlerResult::Responded(outbound)) => outbound,
        Ok(result) => {
            debug!(
                correlation_id = %context.correlation_id,
                result = ?result,
                "event handled without reply"
            );
            return;
        }
        Err(error) => {
            warn!(
                correlation_id = %context.correlation_id,
                error = %error,
                "event dispatch failed; continuing gateway loop"
            );
            return;
        }
    };

    if let Err(error) = sink.send(&outbound).await {
        warn!(
            event_name = "egress.discord.delivery_failed",
            correlation_id = %context.correlation_id,
            channel_id = %outbound.channel_id,
            error = %error,
            "failed to deliver reply"
        );
    }
}
