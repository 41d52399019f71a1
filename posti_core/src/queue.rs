use serde::{Deserialize, Serialize};

/// Name of a queue to declare or consume from
///
/// Either a literal human-readable label or the structured identifier the
/// device bridge uses: device id, service id and characteristic id joined
/// by `/`. The broker treats both as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueDescriptor {
    name: String,
}

impl QueueDescriptor {
    /// Descriptor for a fixed, human-readable queue name
    pub fn named(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Descriptor for a device characteristic queue, `device/service/characteristic`
    pub fn characteristic(
        device: impl ToString,
        service: impl ToString,
        characteristic: impl ToString,
    ) -> Self {
        Self {
            name: format!(
                "{}/{}/{}",
                device.to_string(),
                service.to_string(),
                characteristic.to_string()
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for QueueDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A declared queue as confirmed by the broker
#[derive(Debug, Clone)]
pub struct Queue {
    name: String,
    message_count: u32,
    consumer_count: u32,
}

impl Queue {
    pub fn new(name: impl ToString, message_count: u32, consumer_count: u32) -> Self {
        Self {
            name: name.to_string(),
            message_count,
            consumer_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages sitting ready in the queue at declaration time
    pub fn message_count(&self) -> u32 {
        self.message_count
    }

    /// Consumers registered on the queue at declaration time
    pub fn consumer_count(&self) -> u32 {
        self.consumer_count
    }
}
