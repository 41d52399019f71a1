use posti_core::{AckDecision, Delivery, Result};

/// Processes one delivery and decides its disposition
///
/// Implementations should be decision logic over the delivery; side effects
/// like printing or forwarding belong to the embedding application, which
/// keeps handlers testable without a live broker. Returning an error counts
/// as a failed delivery: the consumer logs it and rejects that delivery when
/// manual acknowledgment is in use, then keeps consuming. Panics are not
/// caught.
pub trait Handler: Send + Sync {
    fn handle(&self, delivery: &Delivery) -> Result<AckDecision>;
}

/// Plain closures over a delivery work as handlers directly
impl<F> Handler for F
where
    F: Fn(&Delivery) -> Result<AckDecision> + Send + Sync,
{
    fn handle(&self, delivery: &Delivery) -> Result<AckDecision> {
        self(delivery)
    }
}
