use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use leetdraw_core::{config::DEFAULT_TRIGGER, QuestionSelector, QuestionSource};
use thiserror::Error;
use tracing::{info, warn};

use crate::{embeds::MessageTemplate, presenter::render_draw};

/// One dispatch frame received from the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayEnvelope {
    pub sequence: Option<u64>,
    pub event: GatewayEvent,
}

impl GatewayEnvelope {
    pub fn correlation_id(&self) -> String {
        match (&self.event, self.sequence) {
            (GatewayEvent::MessageCreate(message), _) => message.message_id.clone(),
            (_, Some(sequence)) => format!("seq-{sequence}"),
            (_, None) => "unknown-correlation-id".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayEvent {
    Ready(ReadyEvent),
    MessageCreate(MessageCreateEvent),
    Unsupported { event_type: String },
}

impl GatewayEvent {
    pub fn event_type(&self) -> GatewayEventType {
        match self {
            Self::Ready(_) => GatewayEventType::Ready,
            Self::MessageCreate(_) => GatewayEventType::MessageCreate,
            Self::Unsupported { .. } => GatewayEventType::Unsupported,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    Ready,
    MessageCreate,
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadyEvent {
    pub session_id: String,
    pub bot_user_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageAuthor {
    pub id: String,
    pub username: String,
    pub bot: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageCreateEvent {
    pub message_id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub author: MessageAuthor,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
    /// Set once the gateway has reported `READY`.
    pub bot_user_id: Option<String>,
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned(), bot_user_id: None }
    }
}

/// A message to post into a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    pub channel_id: String,
    pub message: MessageTemplate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(OutboundMessage),
    Processed,
    Ignored,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventHandlerError {
    #[error("message event is missing field `{0}`")]
    MissingField(&'static str),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] EventHandlerError),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn event_type(&self) -> GatewayEventType;
    async fn handle(
        &self,
        envelope: &GatewayEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError>;
}

#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<GatewayEventType, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(handler.event_type(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        envelope: &GatewayEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, DispatchError> {
        let Some(handler) = self.handlers.get(&envelope.event.event_type()) else {
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(envelope, ctx).await.map_err(DispatchError::from)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Dispatcher answering the draw trigger with a question card.
pub fn draw_dispatcher<S>(
    selector: QuestionSelector<S>,
    trigger: impl Into<String>,
) -> EventDispatcher
where
    S: QuestionSource + 'static,
{
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(DrawTriggerHandler::new(selector, trigger));
    dispatcher
}

pub struct DrawTriggerHandler<S> {
    selector: QuestionSelector<S>,
    trigger: String,
}

impl<S> DrawTriggerHandler<S>
where
    S: QuestionSource,
{
    pub fn new(selector: QuestionSelector<S>, trigger: impl Into<String>) -> Self {
        let trigger = trigger.into().trim().to_owned();
        let trigger = if trigger.is_empty() { DEFAULT_TRIGGER.to_owned() } else { trigger };
        Self { selector, trigger }
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Whole-message match once surrounding whitespace is trimmed; no prefix or substring hits.
    pub fn is_trigger(&self, content: &str) -> bool {
        content.trim() == self.trigger
    }
}

fn is_own_or_bot_message(message: &MessageCreateEvent, ctx: &EventContext) -> bool {
    message.author.bot || ctx.bot_user_id.as_deref().is_some_and(|id| id == message.author.id)
}

#[async_trait]
impl<S> EventHandler for DrawTriggerHandler<S>
where
    S: QuestionSource + 'static,
{
    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::MessageCreate
    }

    async fn handle(
        &self,
        envelope: &GatewayEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let GatewayEvent::MessageCreate(message) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        if is_own_or_bot_message(message, ctx) {
            return Ok(HandlerResult::Ignored);
        }
        if !self.is_trigger(&message.content) {
            return Ok(HandlerResult::Processed);
        }
        if message.channel_id.trim().is_empty() {
            return Err(EventHandlerError::MissingField("channel_id"));
        }

        info!(
            event_name = "ingress.discord.trigger_matched",
            correlation_id = %ctx.correlation_id,
            channel_id = %message.channel_id,
            author_id = %message.author.id,
            "draw trigger received"
        );

        let result = self.selector.draw().await;
        if let Err(error) = &result {
            warn!(
                event_name = "draw.failed",
                correlation_id = %ctx.correlation_id,
                channel_id = %message.channel_id,
                stage = error.stage(),
                error = %error,
                "question draw failed; replying with apology"
            );
        }

        Ok(HandlerResult::Responded(OutboundMessage {
            channel_id: message.channel_id.clone(),
            message: render_draw(&result),
        }))
    }
}
