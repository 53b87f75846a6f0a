use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use scribe_core::{DelRequest, DocumentStore, PutRequest, TransportError, ID_FIELD, REV_FIELD};

/// One request as the transport saw it, for assertions on wire shapes.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub params: Value,
}

#[derive(Clone, Debug)]
struct StoredDocument {
    revision: i64,
    body: Value,
}

/// In-memory document store with real put/del semantics.
///
/// Every request is recorded before being served. Tests that need a
/// transport failure or a malformed acknowledgement can script outcomes
/// with [`MemoryDocumentStore::script_response`]; scripted outcomes are
/// consumed in order before normal handling resumes.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<Mutex<HashMap<String, StoredDocument>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    scripted: Arc<Mutex<VecDeque<Result<Value, TransportError>>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> anyhow::Result<Self> {
        Ok(MemoryDocumentStore::default())
    }

    pub fn script_response(&self, outcome: Result<Value, TransportError>) {
        let mut scripted = self.scripted.lock().unwrap();

        scripted.push_back(outcome);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        let requests = self.requests.lock().unwrap();

        requests.clone()
    }

    pub fn document_count(&self) -> usize {
        let documents = self.documents.lock().unwrap();

        documents.len()
    }

    pub fn get_document(&self, document_id: &str) -> Option<Value> {
        let documents = self.documents.lock().unwrap();

        documents
            .get(document_id)
            .map(|document| document.body.clone())
    }

    pub fn revision_of(&self, document_id: &str) -> Option<i64> {
        let documents = self.documents.lock().unwrap();

        documents.get(document_id).map(|document| document.revision)
    }

    fn put(&self, params: Value) -> Result<Value, TransportError> {
        let request: PutRequest = serde_json::from_value(params)
            .map_err(|err| TransportError::Rejected(err.to_string()))?;

        let mut documents = self.documents.lock().unwrap();
        let mut results = Vec::new();

        for mut object in request.objects {
            let document_id = object
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            let revision = documents
                .get(&document_id)
                .map(|existing| existing.revision + 1)
                .unwrap_or(1);

            if let Some(fields) = object.as_object_mut() {
                fields.remove(ID_FIELD);
                fields.remove(REV_FIELD);
            }

            documents.insert(
                document_id.clone(),
                StoredDocument {
                    revision,
                    body: object,
                },
            );

            results.push(json!({ "id": document_id, "rev": revision }));
        }

        Ok(json!({ "results": results }))
    }

    fn del(&self, params: Value) -> Result<Value, TransportError> {
        let request: DelRequest = serde_json::from_value(params)
            .map_err(|err| TransportError::Rejected(err.to_string()))?;

        let mut documents = self.documents.lock().unwrap();

        // unknown ids are tolerated, deletion is idempotent
        for document_id in request.ids {
            documents.remove(&document_id);
        }

        Ok(json!({}))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn request(&self, endpoint: &str, params: Value) -> Result<Value, TransportError> {
        {
            let mut requests = self.requests.lock().unwrap();

            requests.push(RecordedRequest {
                endpoint: endpoint.to_owned(),
                params: params.clone(),
            });
        }

        let scripted = {
            let mut scripted = self.scripted.lock().unwrap();

            scripted.pop_front()
        };

        if let Some(outcome) = scripted {
            return outcome;
        }

        match endpoint {
            endpoint if endpoint.ends_with("/put") => self.put(params),
            endpoint if endpoint.ends_with("/del") => self.del(params),
            endpoint => Err(TransportError::Unreachable(endpoint.to_owned())),
        }
    }
}
