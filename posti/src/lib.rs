//! Posti is a small broker-consumer client: connect to a message broker,
//! declare a queue, and run a blocking receive loop that hands each
//! delivery to a handler and settles it with the handler's decision.
//!
//! This is an _umbrella crate_ for re-exporting the components from a
//! single place according to the features enabled, like `consume` for the
//! `posti_consume` crate with the receive loop.
//!
//! Shared types from `core` will always be available, regardless of the
//! features enabled. The broker itself stays behind the `core` transport
//! traits; `posti::core::memory` has an in-process broker for tests.

pub use posti_core as core;

#[cfg(feature = "consume")]
pub use posti_consume as consume;

pub mod prelude {
    pub use crate::core::prelude::*;

    #[cfg(feature = "consume")]
    pub use crate::consume::prelude::*;
}
