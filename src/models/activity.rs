use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::PersistError;
use crate::token::PersistToken;

/// An application activity, the unit of persistence. Owns the persist token
/// tracking its document in the store; an in-flight persist command is the
/// only writer of that token until its completion fires.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Activity {
    pub id: u64,

    pub name: String,
    pub creator: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    #[serde(skip)]
    persist_token: PersistToken,
}

impl Activity {
    pub fn new(id: u64, name: &str, creator: &str) -> Self {
        Activity {
            id,
            name: name.to_owned(),
            creator: creator.to_owned(),
            metadata: None,
            persist_token: PersistToken::new(),
        }
    }

    /// Durable document representation. The persist token is not part of
    /// the body; its projection into `_id`/`_rev` happens at request build
    /// time via [`PersistToken::attach_to`].
    pub fn to_document(&self) -> Result<Value, PersistError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn persist_token(&self) -> &PersistToken {
        &self.persist_token
    }

    pub fn persist_token_mut(&mut self) -> &mut PersistToken {
        &mut self.persist_token
    }
}
