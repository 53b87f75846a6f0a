use std::sync::{Arc, Mutex};

use serde_json::json;

use scribe::commands::completion_channel;
use scribe::models::Activity;
use scribe::proxy::DocumentStoreProxy;
use scribe_memory_store::MemoryDocumentStore;

#[tokio::test]
async fn test_e2e() {
    let store = Arc::new(MemoryDocumentStore::new().unwrap());
    let proxy = DocumentStoreProxy::new(store.clone());

    let activity = Arc::new(Mutex::new(Activity::new(
        42,
        "backup-upload",
        "com.example.backup",
    )));

    // first store inserts and assigns an identity
    let (completion, outcome) = completion_channel();
    proxy
        .store_command(Arc::clone(&activity), completion)
        .persist()
        .await;
    assert!(outcome.await.unwrap());

    let document_id = {
        let activity = activity.lock().unwrap();
        let token = activity.persist_token();
        assert_eq!(token.revision(), Some(1));
        token.id().unwrap().to_owned()
    };

    assert_eq!(store.document_count(), 1);
    assert_eq!(
        store.get_document(&document_id).unwrap()["_kind"],
        DocumentStoreProxy::ACTIVITY_KIND
    );

    // a later store overwrites the same document at the next revision
    activity.lock().unwrap().metadata = Some(json!({ "lastRun": "2013-04-02T11:30:00Z" }));

    let (completion, outcome) = completion_channel();
    proxy
        .store_command(Arc::clone(&activity), completion)
        .persist()
        .await;
    assert!(outcome.await.unwrap());

    {
        let activity = activity.lock().unwrap();
        let token = activity.persist_token();
        assert_eq!(token.id(), Some(document_id.as_str()));
        assert_eq!(token.revision(), Some(2));
    }
    assert_eq!(store.document_count(), 1);

    // a stored activity always passes delete validation
    let (completion, outcome) = completion_channel();
    proxy
        .delete_command(Arc::clone(&activity), completion)
        .persist()
        .await;
    assert!(outcome.await.unwrap());

    assert!(!activity.lock().unwrap().persist_token().is_valid());
    assert_eq!(store.document_count(), 0);

    // and a second delete now fails validation without reaching the store
    let requests_before = store.requests().len();

    let (completion, outcome) = completion_channel();
    proxy
        .delete_command(Arc::clone(&activity), completion)
        .persist()
        .await;
    assert!(!outcome.await.unwrap());

    assert_eq!(store.requests().len(), requests_before);
}
