use serde::{Deserialize, Serialize};

/// The handler's disposition of one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckDecision {
    /// Accept the message; the broker removes it from the queue.
    Ack,
    /// Refuse the message; the broker discards it.
    Reject,
    /// Refuse the message but return it to the queue for redelivery.
    RequeueReject,
}

impl std::fmt::Display for AckDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            AckDecision::Ack => "ack",
            AckDecision::Reject => "reject",
            AckDecision::RequeueReject => "requeue-reject",
        };
        write!(f, "{}", str)
    }
}
