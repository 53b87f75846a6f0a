use std::sync::{Arc, Mutex};

use scribe_core::DocumentStore;

use crate::commands::{Completion, DeleteCommand, StoreCommand};
use crate::models::Activity;

/// Factory for persist commands against the document store service.
///
/// Owns the transport handle and the store-facing constants; callers
/// sequence the commands it hands out (at most one in flight per activity).
pub struct DocumentStoreProxy {
    store: Arc<dyn DocumentStore>,
}

impl DocumentStoreProxy {
    /// Kind tag separating activity documents from other kinds in the store.
    pub const ACTIVITY_KIND: &'static str = "scribe.activity:1";

    pub const PUT_ENDPOINT: &'static str = "scribe://documents/put";
    pub const DEL_ENDPOINT: &'static str = "scribe://documents/del";

    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        DocumentStoreProxy { store }
    }

    pub fn store_command(
        &self,
        activity: Arc<Mutex<Activity>>,
        completion: Box<dyn Completion>,
    ) -> StoreCommand {
        StoreCommand::new(Arc::clone(&self.store), activity, completion)
    }

    pub fn delete_command(
        &self,
        activity: Arc<Mutex<Activity>>,
        completion: Box<dyn Completion>,
    ) -> DeleteCommand {
        DeleteCommand::new(Arc::clone(&self.store), activity, completion)
    }
}
