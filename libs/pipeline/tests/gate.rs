mod common;

use std::sync::Arc;

use rowgate_api::{ErrorKind, Value};
use rowgate_pipeline::DedupGate;
use storage_memory::MemoryStore;

use common::config;

const RECORD: &[u8] = br#"{"email": "ada@example.com", "name": "Ada"}"#;

fn gate(store: &Arc<MemoryStore>) -> DedupGate {
    DedupGate::new(&config("users", &["email"]), store.clone()).unwrap()
}

#[tokio::test]
async fn unseen_key_passes_bytes_through_unchanged() {
    let store = Arc::new(MemoryStore::default());
    let gate = gate(&store);

    let out = gate.filter(RECORD).await.unwrap();

    assert_eq!(out.as_deref(), Some(RECORD));
    assert_eq!(
        store.count_calls().await,
        vec![(
            "SELECT count(*) FROM users where email=?".to_string(),
            Value::Text("ada@example.com".into())
        )]
    );
}

#[tokio::test]
async fn stored_key_is_suppressed() {
    let store = Arc::new(MemoryStore::default());
    store.set_count(&Value::from("ada@example.com"), 1).await;
    let gate = gate(&store);

    assert_eq!(gate.filter(RECORD).await.unwrap(), None);
}

#[tokio::test]
async fn impossible_count_is_an_error() {
    let store = Arc::new(MemoryStore::default());
    store.set_count(&Value::from("ada@example.com"), 2).await;
    let gate = gate(&store);

    let err = gate.filter(RECORD).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
    assert!(err.message().contains("unexpected existence count: 2"), "{err}");
}

#[tokio::test]
async fn count_query_without_rows_is_an_error() {
    let store = Arc::new(MemoryStore::default());
    store.set_missing_rows(true).await;
    let gate = gate(&store);

    let err = gate.filter(RECORD).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
}

#[tokio::test]
async fn decode_error_is_scoped_to_one_record() {
    let store = Arc::new(MemoryStore::default());
    let gate = gate(&store);

    let err = gate.filter(b"{broken").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(store.count_calls().await.is_empty(), "no query for undecodable input");

    // the next record is unaffected
    assert!(gate.filter(RECORD).await.unwrap().is_some());
}

#[tokio::test]
async fn missing_key_queries_null() {
    let store = Arc::new(MemoryStore::default());
    let gate = gate(&store);

    let out = gate.filter(br#"{"name": "anon"}"#).await.unwrap();

    assert!(out.is_some());
    assert_eq!(store.count_calls().await[0].1, Value::Null);
}

#[tokio::test]
async fn close_releases_the_store_once() {
    let store = Arc::new(MemoryStore::default());
    gate(&store).close().await;
    assert_eq!(store.close_calls().await, 1);
}
