use posti_core::memory::MemoryBroker;
use posti_core::{Connection, ConnectionConfig};

pub fn create_test_broker() -> MemoryBroker {
    MemoryBroker::new().credentials("user", "password")
}

pub fn create_test_config() -> ConnectionConfig {
    ConnectionConfig::new().username("user").password("password")
}

pub fn create_test_connection(broker: &MemoryBroker) -> Connection {
    Connection::connect(broker, create_test_config()).expect("Failed to connect to broker")
}
