use serde_json::Value;

use scribe_core::{
    PutRequest, TransportError, KIND_FIELD, RESULTS_FIELD, RESULT_ID_FIELD, RESULT_REV_FIELD,
};

use super::{validate, PersistCommand, PersistVerb};
use crate::errors::PersistError;
use crate::models::Activity;
use crate::proxy::DocumentStoreProxy;

/// Insert-or-update of an activity's document.
///
/// First store on an activity submits a pure insert and adopts the id and
/// revision the store assigns; every later store embeds the tracked
/// identity so the request overwrites the same document.
pub type StoreCommand = PersistCommand<StoreVerb>;

pub struct StoreVerb;

impl PersistVerb for StoreVerb {
    const NAME: &'static str = "Store";
    const ENDPOINT: &'static str = DocumentStoreProxy::PUT_ENDPOINT;
    const REQUIRES_TOKEN: bool = false;

    fn update_params(activity: &Activity) -> Result<Value, PersistError> {
        validate(activity, Self::REQUIRES_TOKEN)?;

        let mut document = activity.to_document()?;

        activity.persist_token().attach_to(&mut document);

        if let Some(fields) = document.as_object_mut() {
            fields.insert(
                KIND_FIELD.to_owned(),
                Value::from(DocumentStoreProxy::ACTIVITY_KIND),
            );
        }

        let request = PutRequest {
            objects: vec![document],
        };

        Ok(serde_json::to_value(request)?)
    }

    fn persist_response(
        activity: &mut Activity,
        result: &Result<Value, TransportError>,
    ) -> Result<(), PersistError> {
        // state may have changed while the request was in flight
        if let Err(err) = validate(activity, Self::REQUIRES_TOKEN) {
            tracing::warn!(
                activity = activity.id,
                command = Self::NAME,
                error = %err,
                "validation failed while processing response"
            );
            return Err(err);
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => return Err(err.clone().into()),
        };

        let results = match response.get(RESULTS_FIELD).and_then(Value::as_array) {
            Some(results) => results,
            None => {
                tracing::warn!(
                    activity = activity.id,
                    command = Self::NAME,
                    "results not found in store response"
                );
                return Err(PersistError::MissingField {
                    field: RESULTS_FIELD,
                });
            }
        };

        let first = match results.first() {
            Some(first) => first,
            None => {
                tracing::warn!(
                    activity = activity.id,
                    command = Self::NAME,
                    "store response returned an empty result set"
                );
                return Err(PersistError::EmptyResults);
            }
        };

        let document_id = match first.get(RESULT_ID_FIELD).and_then(Value::as_str) {
            Some(document_id) => document_id,
            None => {
                tracing::warn!(
                    activity = activity.id,
                    command = Self::NAME,
                    "id not found in store response"
                );
                return Err(PersistError::MissingField {
                    field: RESULT_ID_FIELD,
                });
            }
        };

        let revision = match first.get(RESULT_REV_FIELD).and_then(Value::as_i64) {
            Some(revision) => revision,
            None => {
                // the write was accepted but the ack is unusable for
                // revision tracking
                tracing::error!(
                    activity = activity.id,
                    command = Self::NAME,
                    "rev not found in store response"
                );
                return Err(PersistError::MissingField {
                    field: RESULT_REV_FIELD,
                });
            }
        };

        let token = activity.persist_token_mut();

        let applied = if token.is_valid() {
            token.update(document_id, revision)
        } else {
            token.set(document_id, revision)
        };

        if let Err(err) = applied {
            tracing::error!(
                activity = activity.id,
                command = Self::NAME,
                error = %err,
                "failed to set or update persist token"
            );
            return Err(err.into());
        }

        Ok(())
    }
}
