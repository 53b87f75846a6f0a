use serde_json::Value;

use scribe_core::{ID_FIELD, REV_FIELD};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TokenError {
    #[error("persist token already holds a document identity")]
    AlreadyValid,
    #[error("persist token holds no document identity")]
    NotValid,
    #[error("document id {attempted} does not match tracked id {current}")]
    IdentityMismatch { current: String, attempted: String },
}

/// Durable identity of one activity's document in the store.
///
/// Starts out invalid (no document exists yet), becomes valid when a store
/// acknowledgement assigns an id and revision, and is cleared again by a
/// successful delete. While valid, the id never changes; only the revision
/// advances as the store acknowledges further writes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PersistToken {
    identity: Option<(String, i64)>,
}

impl PersistToken {
    pub fn new() -> Self {
        PersistToken::default()
    }

    pub fn is_valid(&self) -> bool {
        self.identity.is_some()
    }

    pub fn id(&self) -> Option<&str> {
        self.identity.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn revision(&self) -> Option<i64> {
        self.identity.as_ref().map(|(_, revision)| *revision)
    }

    /// Adopts the identity assigned by the first successful store.
    pub fn set(&mut self, id: &str, revision: i64) -> Result<(), TokenError> {
        if self.identity.is_some() {
            return Err(TokenError::AlreadyValid);
        }

        self.identity = Some((id.to_owned(), revision));

        Ok(())
    }

    /// Advances the revision after a later successful store. The store's
    /// revision is authoritative, so no monotonicity check is made here.
    pub fn update(&mut self, id: &str, revision: i64) -> Result<(), TokenError> {
        match &mut self.identity {
            None => Err(TokenError::NotValid),
            Some((current, tracked_revision)) => {
                if current != id {
                    return Err(TokenError::IdentityMismatch {
                        current: current.clone(),
                        attempted: id.to_owned(),
                    });
                }

                *tracked_revision = revision;

                Ok(())
            }
        }
    }

    /// Drops the identity. Idempotent: a delete acknowledgement clears the
    /// token whether or not it is still valid at that point.
    pub fn clear(&mut self) {
        self.identity = None;
    }

    /// Embeds the identity into a document body so the store overwrites the
    /// tracked document instead of inserting a new one. Leaves the document
    /// untouched while invalid, which makes the request a pure insert.
    pub fn attach_to(&self, document: &mut Value) {
        if let Some((id, revision)) = &self.identity {
            if let Some(fields) = document.as_object_mut() {
                fields.insert(ID_FIELD.to_owned(), Value::from(id.as_str()));
                fields.insert(REV_FIELD.to_owned(), Value::from(*revision));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_set_then_update() {
        let mut token = PersistToken::new();
        assert!(!token.is_valid());

        token.set("b8f7", 1).unwrap();
        assert!(token.is_valid());
        assert_eq!(token.id(), Some("b8f7"));
        assert_eq!(token.revision(), Some(1));

        token.update("b8f7", 2).unwrap();
        assert_eq!(token.revision(), Some(2));
    }

    #[test]
    fn test_set_fails_while_valid() {
        let mut token = PersistToken::new();
        token.set("b8f7", 1).unwrap();

        assert_eq!(token.set("b8f7", 2), Err(TokenError::AlreadyValid));
    }

    #[test]
    fn test_update_fails_while_invalid() {
        let mut token = PersistToken::new();

        assert_eq!(token.update("b8f7", 1), Err(TokenError::NotValid));
    }

    #[test]
    fn test_update_rejects_identity_change() {
        let mut token = PersistToken::new();
        token.set("b8f7", 1).unwrap();

        let err = token.update("c911", 2).unwrap_err();

        assert_eq!(
            err,
            TokenError::IdentityMismatch {
                current: "b8f7".to_owned(),
                attempted: "c911".to_owned(),
            }
        );
        assert_eq!(token.id(), Some("b8f7"));
        assert_eq!(token.revision(), Some(1));
    }

    #[test]
    fn test_update_accepts_non_monotonic_revision() {
        let mut token = PersistToken::new();
        token.set("b8f7", 5).unwrap();

        // the store is the source of truth, even when it reports a lower revision
        token.update("b8f7", 3).unwrap();

        assert_eq!(token.revision(), Some(3));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut token = PersistToken::new();
        token.set("b8f7", 1).unwrap();

        token.clear();
        assert!(!token.is_valid());

        token.clear();
        assert!(!token.is_valid());
    }

    #[test]
    fn test_attach_to_embeds_identity_when_valid() {
        let mut token = PersistToken::new();
        token.set("b8f7", 4).unwrap();

        let mut document = json!({ "name": "sync" });
        token.attach_to(&mut document);

        assert_eq!(
            document,
            json!({ "name": "sync", "_id": "b8f7", "_rev": 4 })
        );
    }

    #[test]
    fn test_attach_to_leaves_document_untouched_while_invalid() {
        let token = PersistToken::new();

        let mut document = json!({ "name": "sync" });
        token.attach_to(&mut document);

        assert_eq!(document, json!({ "name": "sync" }));
    }
}
