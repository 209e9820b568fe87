//! Runtime core: the update channel and everything it drives.
//!
//! The only public API from this module is [`UpdateChannel`] (with its builder,
//! configuration and introspection types).
//!
//! Internal modules:
//! - [`channel`]: connection state machine, send path and drain loop;
//! - [`senders`]: typed send operations;
//! - [`signaling`]: subscription intents;
//! - [`delivery`]: one transport attempt with timeout;
//! - [`dispatcher`]: fan-out of received envelopes to typed channels;
//! - [`heartbeat`]: periodic liveness notifications while connected;
//! - [`queue`]: FIFO of pending envelopes and the single-drain guard;
//! - [`state`]: mutex-guarded channel state.

mod builder;
mod channel;
mod config;
mod delivery;
mod dispatcher;
mod heartbeat;
mod queue;
mod senders;
mod signaling;
mod state;

pub use builder::ChannelBuilder;
pub use channel::UpdateChannel;
pub use config::ChannelConfig;
pub use state::{ChannelStats, ConnectionState};
