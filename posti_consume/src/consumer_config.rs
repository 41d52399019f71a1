use std::time::Duration;

/// Configuration options for a Consumer
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Whether the broker should treat deliveries as pre-acknowledged
    auto_ack: bool,

    /// How long one blocking wait for a delivery lasts before the loop
    /// checks for a stop request again
    poll_timeout: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            auto_ack: false,
            poll_timeout: Duration::from_millis(500),
        }
    }
}

impl ConsumerConfig {
    pub fn new() -> ConsumerConfig {
        ConsumerConfig::default()
    }

    /// Tell the broker to consider every delivery acknowledged on send
    ///
    /// The handler's decision is then ignored for acknowledgment purposes
    /// and a message handed out right before a crash is lost. Off by
    /// default; only enable it when losing messages is acceptable.
    pub fn auto_ack(mut self, auto_ack: bool) -> ConsumerConfig {
        self.auto_ack = auto_ack;
        self
    }
    pub fn get_auto_ack(&self) -> bool {
        self.auto_ack
    }

    pub fn poll_timeout(mut self, poll_timeout: Duration) -> ConsumerConfig {
        self.poll_timeout = poll_timeout;
        self
    }
    pub fn get_poll_timeout(&self) -> Duration {
        self.poll_timeout
    }
}
