use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved document fields consumed by the store.
pub const KIND_FIELD: &str = "_kind";
pub const ID_FIELD: &str = "_id";
pub const REV_FIELD: &str = "_rev";

/// Fields of a put acknowledgement.
pub const RESULTS_FIELD: &str = "results";
pub const RESULT_ID_FIELD: &str = "id";
pub const RESULT_REV_FIELD: &str = "rev";

/// Body of a put request. The verb is defined over batches; callers that
/// persist a single document submit a one-element batch.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PutRequest {
    pub objects: Vec<Value>,
}

/// Body of a del request, naming the documents to remove by id.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DelRequest {
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_put_request_shape() -> anyhow::Result<()> {
        let request = PutRequest {
            objects: vec![json!({ "name": "sync", "_kind": "scribe.activity:1" })],
        };

        let body = serde_json::to_value(&request)?;

        assert_eq!(
            body,
            json!({ "objects": [{ "name": "sync", "_kind": "scribe.activity:1" }] })
        );

        Ok(())
    }

    #[test]
    fn test_del_request_shape() -> anyhow::Result<()> {
        let request = DelRequest {
            ids: vec!["b8f7".to_owned()],
        };

        let body = serde_json::to_value(&request)?;

        assert_eq!(body, json!({ "ids": ["b8f7"] }));

        Ok(())
    }
}
