use serde_json::Value;

use scribe_core::{DelRequest, TransportError};

use super::{validate, PersistCommand, PersistVerb};
use crate::errors::PersistError;
use crate::models::Activity;
use crate::proxy::DocumentStoreProxy;

/// Removal of an activity's document. Refuses to dispatch while the
/// activity has no persisted identity; there is nothing to delete.
pub type DeleteCommand = PersistCommand<DeleteVerb>;

pub struct DeleteVerb;

impl PersistVerb for DeleteVerb {
    const NAME: &'static str = "Delete";
    const ENDPOINT: &'static str = DocumentStoreProxy::DEL_ENDPOINT;
    const REQUIRES_TOKEN: bool = true;

    fn update_params(activity: &Activity) -> Result<Value, PersistError> {
        validate(activity, Self::REQUIRES_TOKEN)?;

        let document_id = activity
            .persist_token()
            .id()
            .ok_or(PersistError::InvalidState(
                "activity has no persisted identity",
            ))?;

        let request = DelRequest {
            ids: vec![document_id.to_owned()],
        };

        Ok(serde_json::to_value(request)?)
    }

    fn persist_response(
        activity: &mut Activity,
        result: &Result<Value, TransportError>,
    ) -> Result<(), PersistError> {
        match result {
            Ok(_) => {
                // deleted or already gone, either way the identity is spent;
                // the response body carries nothing further
                activity.persist_token_mut().clear();

                Ok(())
            }
            // token stays valid, the same id can be retried
            Err(err) => Err(err.clone().into()),
        }
    }
}
