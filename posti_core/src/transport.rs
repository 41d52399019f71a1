use crate::{ConnectionConfig, Delivery, Queue, QueueDescriptor, Result};
use std::time::Duration;
use tracing::debug;

/// Broker-side entry point: opens authenticated transports
///
/// This is the seam the broker sits behind; the wire protocol itself is the
/// implementor's business. [`MemoryBroker`](crate::memory::MemoryBroker)
/// implements it in-process for tests and local development.
pub trait Dial {
    /// Open a transport and authenticate with the config's credential pair
    fn dial(&self, config: &ConnectionConfig) -> Result<Box<dyn Transport>>;
}

/// One open, authenticated link to the broker
///
/// All operations target the single consumer registration the transport
/// carries; a transport is owned by exactly one [`Connection`] and is never
/// shared across threads.
pub trait Transport: Send {
    /// Idempotently ensure the queue exists and report its current counts
    fn declare_queue(&mut self, descriptor: &QueueDescriptor) -> Result<Queue>;

    /// Register a consumer on the queue
    ///
    /// With `auto_ack` the broker treats every delivery as pre-acknowledged
    /// on send and no disposition is expected afterwards.
    fn basic_consume(&mut self, queue: &str, consumer_tag: &str, auto_ack: bool) -> Result<()>;

    /// Block up to `timeout` for the next delivery; `None` means the wait
    /// timed out and the queue stayed quiet
    fn next_delivery(&mut self, timeout: Duration) -> Result<Option<Delivery>>;

    /// Accept the delivery with the given tag
    fn ack(&mut self, delivery_tag: u64) -> Result<()>;

    /// Refuse the delivery with the given tag, optionally returning it to
    /// the queue for redelivery
    fn reject(&mut self, delivery_tag: u64, requeue: bool) -> Result<()>;

    /// Deregister the consumer; the connection stays open
    fn cancel(&mut self, consumer_tag: &str) -> Result<()>;

    /// Release the connection on the broker side; must be idempotent
    fn close(&mut self) -> Result<()>;
}

/// An exclusive, live connection to the broker
///
/// Owns its transport. The connection is released at most once: explicitly
/// through [`Connection::close`] or implicitly on drop, whichever comes
/// first, so broker-side resources are not leaked on any exit path.
pub struct Connection {
    transport: Box<dyn Transport>,
    config: ConnectionConfig,
    open: bool,
}

impl Connection {
    /// Open a transport through `broker` and authenticate
    pub fn connect(broker: &dyn Dial, config: ConnectionConfig) -> Result<Self> {
        let transport = broker.dial(&config)?;
        debug!(
            host = %config.get_host(),
            port = config.get_port(),
            virtual_host = %config.get_virtual_host(),
            "broker connection opened"
        );
        Ok(Self {
            transport,
            config,
            open: true,
        })
    }

    /// Idempotently ensure the queue exists on the broker
    pub fn declare_queue(&mut self, descriptor: &QueueDescriptor) -> Result<Queue> {
        self.ensure_open()?;
        let queue = self.transport.declare_queue(descriptor)?;
        debug!(
            queue = %queue.name(),
            messages = queue.message_count(),
            consumers = queue.consumer_count(),
            "queue declared"
        );
        Ok(queue)
    }

    /// Register a consumer on the queue; see [`Transport::basic_consume`]
    pub fn basic_consume(
        &mut self,
        queue: &str,
        consumer_tag: &str,
        auto_ack: bool,
    ) -> Result<()> {
        self.ensure_open()?;
        self.transport.basic_consume(queue, consumer_tag, auto_ack)
    }

    /// Block up to `timeout` for the next delivery
    pub fn next_delivery(&mut self, timeout: Duration) -> Result<Option<Delivery>> {
        self.ensure_open()?;
        self.transport.next_delivery(timeout)
    }

    pub fn ack(&mut self, delivery_tag: u64) -> Result<()> {
        self.ensure_open()?;
        self.transport.ack(delivery_tag)
    }

    pub fn reject(&mut self, delivery_tag: u64, requeue: bool) -> Result<()> {
        self.ensure_open()?;
        self.transport.reject(delivery_tag, requeue)
    }

    pub fn cancel(&mut self, consumer_tag: &str) -> Result<()> {
        self.ensure_open()?;
        self.transport.cancel(consumer_tag)
    }

    /// Release the connection; safe to call more than once
    pub fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.transport.close()?;
        debug!(host = %self.config.get_host(), "broker connection closed");
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(crate::PostiError::Connection(
                "connection is closed".to_string(),
            ))
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            let _ = self.transport.close();
        }
    }
}
