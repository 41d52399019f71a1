//! Posti consumer components for processing deliveries from a queue
//!
//! The Consumer owns one broker connection, registers itself on one queue
//! and runs the blocking receive loop that feeds a [`Handler`].

mod consumer;
mod consumer_config;
mod handler;
mod stop;

pub use consumer::Consumer;
pub use consumer_config::ConsumerConfig;
pub use handler::Handler;
pub use stop::StopHandle;

pub mod prelude {
    pub use crate::{Consumer, ConsumerConfig, Handler, StopHandle};
}
