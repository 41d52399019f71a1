mod common;

use common::{create_test_broker, create_test_config, create_test_connection};
use posti_core::memory::MemoryBroker;
use posti_core::{Connection, PostiError, QueueDescriptor};

#[test]
fn test_connect_and_declare() {
    let broker = create_test_broker();
    let mut connection = create_test_connection(&broker);
    assert!(connection.is_open());

    let queue = connection
        .declare_queue(&QueueDescriptor::named("hello"))
        .unwrap();
    assert_eq!(queue.name(), "hello");
    assert_eq!(queue.message_count(), 0);
    assert_eq!(queue.consumer_count(), 0);

    // declaring the same queue again is fine
    connection
        .declare_queue(&QueueDescriptor::named("hello"))
        .unwrap();

    connection.close().unwrap();
    assert!(!connection.is_open());
    assert_eq!(broker.closed_connections(), 1);
}

#[test]
fn test_unreachable_broker_refuses_connect() {
    let broker = MemoryBroker::new();
    broker.refuse_connections();
    let result = Connection::connect(&broker, create_test_config());
    assert!(matches!(
        result.err().unwrap(),
        PostiError::Connection(_)
    ));
}

#[test]
fn test_bad_credentials_refuse_connect() {
    let broker = create_test_broker();
    let config = create_test_config().password("hunter2");
    let result = Connection::connect(&broker, config);
    assert!(matches!(
        result.err().unwrap(),
        PostiError::Connection(_)
    ));
}

#[test]
fn test_declare_reports_existing_messages() {
    let broker = create_test_broker();
    broker.publish("backlog", b"one".to_vec());
    broker.publish("backlog", b"two".to_vec());

    let mut connection = create_test_connection(&broker);
    let queue = connection
        .declare_queue(&QueueDescriptor::named("backlog"))
        .unwrap();
    assert_eq!(queue.message_count(), 2);
}

#[test]
fn test_close_is_idempotent() {
    let broker = create_test_broker();
    let mut connection = create_test_connection(&broker);
    connection.close().unwrap();
    connection.close().unwrap();
    drop(connection);
    assert_eq!(broker.closed_connections(), 1);
}

#[test]
fn test_drop_releases_connection() {
    let broker = create_test_broker();
    let connection = create_test_connection(&broker);
    drop(connection);
    assert_eq!(broker.closed_connections(), 1);
}
