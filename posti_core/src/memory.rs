//! An in-process broker for tests and local development.
//!
//! [`MemoryBroker`] implements [`Dial`] without any networking: published
//! messages flow through a channel straight into whichever consumer is
//! registered on the queue. It keeps the bookkeeping a test needs to assert
//! on (queue depths, recorded dispositions, connection close counts) and
//! mimics the broker behaviors the client contract depends on: per-queue
//! FIFO order, delivery tags increasing from 1 per connection, exactly one
//! disposition per manual-ack delivery, and requeued or unsettled messages
//! returning to the front of the queue flagged as redelivered.
//!
//! Queues come into existence when declared or first published to. Each
//! queue takes a single consumer at a time.

use crate::{
    AckDecision, ConnectionConfig, Delivery, Dial, PostiError, Queue, QueueDescriptor, Result,
    Transport,
};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-process broker; cheap to clone, all clones share the same state
#[derive(Clone, Default)]
pub struct MemoryBroker {
    inner: Arc<Mutex<BrokerInner>>,
}

#[derive(Default)]
struct BrokerInner {
    credentials: Option<(String, String)>,
    refuse_connections: bool,
    next_connection_id: u64,
    closed_connections: usize,
    queues: HashMap<String, MemoryQueue>,
}

#[derive(Default)]
struct MemoryQueue {
    ready: VecDeque<QueuedMessage>,
    consumer: Option<ConsumerEntry>,
    dispositions: Vec<(u64, AckDecision)>,
}

struct QueuedMessage {
    payload: Vec<u8>,
    redelivered: bool,
}

struct ConsumerEntry {
    owner: u64,
    tag: String,
    auto_ack: bool,
    next_delivery_tag: u64,
    unacked: Vec<(u64, QueuedMessage)>,
    sender: Sender<Delivery>,
}

impl MemoryQueue {
    /// Stream ready messages to the registered consumer, oldest first
    fn pump(&mut self) {
        let Some(mut consumer) = self.consumer.take() else {
            return;
        };
        let mut alive = true;
        while alive {
            let Some(message) = self.ready.pop_front() else {
                break;
            };
            let delivery_tag = consumer.next_delivery_tag;
            consumer.next_delivery_tag += 1;
            let delivery = Delivery::new(delivery_tag, message.redelivered, message.payload.clone());
            if consumer.sender.send(delivery).is_err() {
                // receiver side is gone; keep the message for the next consumer
                self.ready.push_front(message);
                alive = false;
            } else if !consumer.auto_ack {
                consumer.unacked.push((delivery_tag, message));
            }
        }
        if alive {
            self.consumer = Some(consumer);
        }
    }

    /// Drop the consumer registration and return its unsettled messages to
    /// the front of the queue, flagged as redelivered
    fn deregister(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            for (_, message) in consumer.unacked.into_iter().rev() {
                self.ready.push_front(QueuedMessage {
                    payload: message.payload,
                    redelivered: true,
                });
            }
        }
    }
}

impl MemoryBroker {
    pub fn new() -> MemoryBroker {
        MemoryBroker::default()
    }

    /// Require this credential pair on dial; anything else is refused
    pub fn credentials(self, username: impl ToString, password: impl ToString) -> MemoryBroker {
        self.inner.lock().unwrap().credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Refuse every dial from now on, like an unreachable endpoint would
    pub fn refuse_connections(&self) {
        self.inner.lock().unwrap().refuse_connections = true;
    }

    /// Append a message to the named queue, creating the queue on demand
    pub fn publish(&self, queue: &str, payload: impl Into<Vec<u8>>) {
        let mut inner = self.inner.lock().unwrap();
        let queue = inner.queues.entry(queue.to_string()).or_default();
        queue.ready.push_back(QueuedMessage {
            payload: payload.into(),
            redelivered: false,
        });
        queue.pump();
    }

    /// Messages sitting ready in the named queue, zero if it does not exist
    pub fn queue_depth(&self, queue: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.queues.get(queue).map_or(0, |q| q.ready.len())
    }

    /// Dispositions recorded against the named queue, in settle order
    pub fn dispositions(&self, queue: &str) -> Vec<(u64, AckDecision)> {
        let inner = self.inner.lock().unwrap();
        inner
            .queues
            .get(queue)
            .map_or_else(Vec::new, |q| q.dispositions.clone())
    }

    /// How many connections have been released so far
    pub fn closed_connections(&self) -> usize {
        self.inner.lock().unwrap().closed_connections
    }
}

impl Dial for MemoryBroker {
    fn dial(&self, config: &ConnectionConfig) -> Result<Box<dyn Transport>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.refuse_connections {
            return Err(PostiError::Connection(format!(
                "connection refused: {}:{}",
                config.get_host(),
                config.get_port()
            )));
        }
        if let Some((username, password)) = &inner.credentials {
            if username != config.get_username() || password != config.get_password() {
                return Err(PostiError::Connection(format!(
                    "access refused for user: {}",
                    config.get_username()
                )));
            }
        }
        inner.next_connection_id += 1;
        Ok(Box::new(MemoryTransport {
            inner: Arc::clone(&self.inner),
            id: inner.next_connection_id,
            consuming: None,
            receiver: None,
            closed: false,
        }))
    }
}

struct MemoryTransport {
    inner: Arc<Mutex<BrokerInner>>,
    id: u64,
    consuming: Option<String>,
    receiver: Option<Receiver<Delivery>>,
    closed: bool,
}

impl MemoryTransport {
    /// Record exactly one disposition for the tag and apply its effect
    fn settle(&mut self, delivery_tag: u64, decision: AckDecision) -> Result<()> {
        let queue_name = self
            .consuming
            .as_ref()
            .ok_or_else(|| PostiError::Consume("no active consumer".to_string()))?;
        let mut inner = self.inner.lock().unwrap();
        let queue = inner
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| PostiError::Consume(format!("queue is gone: {}", queue_name)))?;

        let message = {
            let consumer = queue
                .consumer
                .as_mut()
                .filter(|c| c.owner == self.id)
                .ok_or_else(|| {
                    PostiError::Consume("consumer is no longer registered".to_string())
                })?;
            let position = consumer
                .unacked
                .iter()
                .position(|(tag, _)| *tag == delivery_tag)
                .ok_or_else(|| {
                    PostiError::Consume(format!("unknown delivery tag: {}", delivery_tag))
                })?;
            consumer.unacked.remove(position).1
        };

        queue.dispositions.push((delivery_tag, decision));
        if decision == AckDecision::RequeueReject {
            queue.ready.push_front(QueuedMessage {
                payload: message.payload,
                redelivered: true,
            });
            queue.pump();
        }
        Ok(())
    }
}

impl Transport for MemoryTransport {
    fn declare_queue(&mut self, descriptor: &QueueDescriptor) -> Result<Queue> {
        if descriptor.name().is_empty() {
            return Err(PostiError::Declaration(
                "queue name must not be empty".to_string(),
            ));
        }
        let mut inner = self.inner.lock().unwrap();
        let queue = inner.queues.entry(descriptor.name().to_string()).or_default();
        Ok(Queue::new(
            descriptor.name(),
            queue.ready.len() as u32,
            queue.consumer.is_some() as u32,
        ))
    }

    fn basic_consume(&mut self, queue: &str, consumer_tag: &str, auto_ack: bool) -> Result<()> {
        if self.consuming.is_some() {
            return Err(PostiError::Consume(
                "connection already has an active consumer".to_string(),
            ));
        }
        let mut inner = self.inner.lock().unwrap();
        let entry = inner
            .queues
            .get_mut(queue)
            .ok_or_else(|| PostiError::Consume(format!("no queue named: {}", queue)))?;
        if entry.consumer.is_some() {
            return Err(PostiError::Consume(format!(
                "queue already has a consumer: {}",
                queue
            )));
        }
        let (sender, receiver) = unbounded();
        entry.consumer = Some(ConsumerEntry {
            owner: self.id,
            tag: consumer_tag.to_string(),
            auto_ack,
            next_delivery_tag: 1,
            unacked: Vec::new(),
            sender,
        });
        entry.pump();
        self.consuming = Some(queue.to_string());
        self.receiver = Some(receiver);
        Ok(())
    }

    fn next_delivery(&mut self, timeout: Duration) -> Result<Option<Delivery>> {
        let receiver = self
            .receiver
            .as_ref()
            .ok_or_else(|| PostiError::Consume("no active consumer".to_string()))?;
        match receiver.recv_timeout(timeout) {
            Ok(delivery) => Ok(Some(delivery)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(PostiError::Consume("broker went away".to_string()))
            }
        }
    }

    fn ack(&mut self, delivery_tag: u64) -> Result<()> {
        self.settle(delivery_tag, AckDecision::Ack)
    }

    fn reject(&mut self, delivery_tag: u64, requeue: bool) -> Result<()> {
        let decision = if requeue {
            AckDecision::RequeueReject
        } else {
            AckDecision::Reject
        };
        self.settle(delivery_tag, decision)
    }

    fn cancel(&mut self, consumer_tag: &str) -> Result<()> {
        let Some(queue_name) = self.consuming.clone() else {
            return Ok(());
        };
        {
            let mut inner = self.inner.lock().unwrap();
            if let Some(queue) = inner.queues.get_mut(&queue_name) {
                let owned = queue
                    .consumer
                    .as_ref()
                    .is_some_and(|c| c.owner == self.id && c.tag == consumer_tag);
                if !owned {
                    return Err(PostiError::Consume(format!(
                        "unknown consumer tag: {}",
                        consumer_tag
                    )));
                }
                queue.deregister();
            }
        }
        self.consuming = None;
        self.receiver = None;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut inner = self.inner.lock().unwrap();
        if let Some(queue_name) = self.consuming.take() {
            if let Some(queue) = inner.queues.get_mut(&queue_name) {
                let owned = queue.consumer.as_ref().is_some_and(|c| c.owner == self.id);
                if owned {
                    queue.deregister();
                }
            }
        }
        inner.closed_connections += 1;
        self.receiver = None;
        Ok(())
    }
}
