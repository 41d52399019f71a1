use crate::{ConsumerConfig, Handler, StopHandle};
use posti_core::{AckDecision, Connection, Delivery, Queue, Result, generate_consumer_tag};
use tracing::{debug, info, warn};

/// Interface for receiving, processing and settling deliveries from one queue
///
/// A consumer exclusively owns its connection; run one consumer per thread
/// when consuming several queues. Deliveries are handled one at a time in
/// the order the broker sends them.
pub struct Consumer<H: Handler> {
    connection: Connection,
    queue: Queue,
    config: ConsumerConfig,
    handler: H,
    stop: StopHandle,
    consumer_tag: Option<String>,
}

impl<H: Handler> Consumer<H> {
    pub fn new(connection: Connection, queue: Queue, handler: H) -> Self {
        Self {
            connection,
            queue,
            config: ConsumerConfig::default(),
            handler,
            stop: StopHandle::new(),
            consumer_tag: None,
        }
    }

    pub fn with_config(mut self, config: ConsumerConfig) -> Self {
        self.config = config;
        self
    }

    /// Handle for requesting the blocking loop to stop from another thread
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Register on the queue and process deliveries until stopped
    ///
    /// Blocks the calling thread. A transport failure terminates the loop
    /// and surfaces after the connection has been released; a handler
    /// failure only fails its own delivery. On a stop request the loop
    /// finishes the delivery in hand, releases the connection and returns
    /// `Ok`.
    pub fn run(mut self) -> Result<()> {
        self.ensure_registered()?;
        info!(queue = %self.queue.name(), "waiting for messages");
        while !self.stop.is_stopped() {
            self.run_next()?;
        }
        if let Some(consumer_tag) = self.consumer_tag.take() {
            self.connection.cancel(&consumer_tag)?;
        }
        self.connection.close()?;
        info!(queue = %self.queue.name(), "consumer stopped");
        Ok(())
    }

    /// Process at most one delivery, waiting up to the poll timeout
    ///
    /// Returns the decision taken for the delivery, or `None` when the wait
    /// timed out with the queue quiet.
    pub fn run_next(&mut self) -> Result<Option<AckDecision>> {
        self.ensure_registered()?;
        match self.connection.next_delivery(self.config.get_poll_timeout())? {
            Some(delivery) => Ok(Some(self.dispatch(delivery)?)),
            None => Ok(None),
        }
    }

    fn ensure_registered(&mut self) -> Result<()> {
        if self.consumer_tag.is_some() {
            return Ok(());
        }
        let consumer_tag = generate_consumer_tag();
        self.connection
            .basic_consume(self.queue.name(), &consumer_tag, self.config.get_auto_ack())?;
        debug!(
            queue = %self.queue.name(),
            consumer_tag = %consumer_tag,
            auto_ack = self.config.get_auto_ack(),
            "consumer registered"
        );
        self.consumer_tag = Some(consumer_tag);
        Ok(())
    }

    fn dispatch(&mut self, delivery: Delivery) -> Result<AckDecision> {
        let decision = match self.handler.handle(&delivery) {
            Ok(decision) => decision,
            Err(err) => {
                warn!(
                    delivery_tag = delivery.delivery_tag,
                    error = %err,
                    "handler failed, rejecting delivery"
                );
                AckDecision::Reject
            }
        };
        if !self.config.get_auto_ack() {
            match decision {
                AckDecision::Ack => self.connection.ack(delivery.delivery_tag)?,
                AckDecision::Reject => self.connection.reject(delivery.delivery_tag, false)?,
                AckDecision::RequeueReject => self.connection.reject(delivery.delivery_tag, true)?,
            }
        }
        debug!(
            delivery_tag = delivery.delivery_tag,
            decision = %decision,
            "delivery processed"
        );
        Ok(decision)
    }
}
