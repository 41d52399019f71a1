use posti_consume::Handler;
use posti_core::{AckDecision, Delivery, PostiError, Result};
use std::sync::{Arc, Mutex};

/// Records every delivery it sees and answers with a fixed decision
#[derive(Clone)]
pub struct RecordingHandler {
    seen: Arc<Mutex<Vec<Delivery>>>,
    decision: AckDecision,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::with_decision(AckDecision::Ack)
    }

    pub fn with_decision(decision: AckDecision) -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
            decision,
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.seen.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.deliveries().into_iter().map(|d| d.payload).collect()
    }
}

impl Handler for RecordingHandler {
    fn handle(&self, delivery: &Delivery) -> Result<AckDecision> {
        self.seen.lock().unwrap().push(delivery.clone());
        Ok(self.decision)
    }
}

/// Fails on one specific payload, acks everything else
#[derive(Clone)]
pub struct PoisonHandler {
    poison: Vec<u8>,
}

impl PoisonHandler {
    pub fn new(poison: impl Into<Vec<u8>>) -> Self {
        Self {
            poison: poison.into(),
        }
    }
}

impl Handler for PoisonHandler {
    fn handle(&self, delivery: &Delivery) -> Result<AckDecision> {
        if delivery.payload == self.poison {
            return Err(PostiError::Handler("refusing poisoned payload".to_string()));
        }
        Ok(AckDecision::Ack)
    }
}
