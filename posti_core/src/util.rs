use crate::{PostiError, Result};
use ulid::Ulid;

/// Generate a new tag for a consumer registration
pub fn generate_consumer_tag() -> String {
    format!("posti-{}", Ulid::new())
}

/// A standardized way to read the POSTI_BROKER_URL env var with BROKER_URL as fallback
pub fn get_broker_url() -> Result<String> {
    std::env::var("POSTI_BROKER_URL")
        .or_else(|_| std::env::var("BROKER_URL"))
        .map_err(|_| PostiError::MissingEnvVar("POSTI_BROKER_URL"))
}
