//! Discord chat surface for leetdraw
//!
//! - **Gateway** (`gateway`) - event loop over a pluggable transport, with reconnect backoff
//! - **Events** (`events`) - typed gateway events, dispatcher and the draw trigger handler
//! - **Embeds** (`embeds`) - serializable message/embed model and builder
//! - **Presenter** (`presenter`) - renders a drawn question (or the apology) as a message
//! - **REST** (`rest`) - posts replies to `POST /channels/{id}/messages`
//!
//! ```text
//! Gateway event → EventDispatcher → DrawTriggerHandler → QuestionSelector
//!                                          ↓
//!                     MessageSink ← presenter::render_draw
//! ```

pub mod embeds;
pub mod events;
pub mod gateway;
pub mod presenter;
pub mod rest;

pub use events::{draw_dispatcher, DrawTriggerHandler, EventDispatcher, OutboundMessage};
pub use gateway::{GatewayRunner, GatewayTransport, NoopGatewayTransport, ReconnectPolicy};
pub use rest::{DiscordRestSink, MessageSink, NoopMessageSink};
