//! `posti_core` provides shared types for the Posti consumer client.
//!
//! This crate includes the connection configuration, queue descriptors,
//! delivery and acknowledgment types, the error type, and the transport
//! seam the broker sits behind, including the in-process [`memory`] broker.

mod ack_decision;
mod connection_config;
mod delivery;
mod error;
pub mod memory;
mod queue;
mod transport;
mod util;

pub use ack_decision::AckDecision;
pub use connection_config::{ConnectionConfig, DEFAULT_PORT};
pub use delivery::Delivery;
pub use error::{PostiError, Result};
pub use queue::{Queue, QueueDescriptor};
pub use transport::{Connection, Dial, Transport};
pub use util::{generate_consumer_tag, get_broker_url};

pub mod prelude {
    pub use crate::{
        AckDecision, Connection, ConnectionConfig, Delivery, PostiError, Queue, QueueDescriptor,
    };
}
