/// One message handed to a consumer, with broker-assigned tracking metadata
///
/// A delivery is owned by the consumer only for the duration of one handler
/// invocation and gets exactly one disposition when manual acknowledgment
/// is in use.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Broker-assigned tag, unique and increasing within one connection
    pub delivery_tag: u64,

    /// Whether the broker already handed this message out once before
    pub redelivered: bool,

    /// The opaque message body
    pub payload: Vec<u8>,
}

impl Delivery {
    pub fn new(delivery_tag: u64, redelivered: bool, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            delivery_tag,
            redelivered,
            payload: payload.into(),
        }
    }
}
