mod delete;
mod store;

pub use delete::{DeleteCommand, DeleteVerb};
pub use store::{StoreCommand, StoreVerb};

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::oneshot;

use scribe_core::{DocumentStore, TransportError};

use crate::errors::PersistError;
use crate::models::Activity;

/// Single-invocation callback a persist command reports its outcome
/// through. Consuming `self` makes "at most once" a compile-time property;
/// the command guarantees "at least once" on every code path.
pub trait Completion: Send {
    fn complete(self: Box<Self>, success: bool);
}

impl<F> Completion for F
where
    F: FnOnce(bool) + Send,
{
    fn complete(self: Box<Self>, success: bool) {
        (*self)(success)
    }
}

/// Completion paired with a one-shot receiver for callers that want to
/// await the outcome instead of handling a callback.
pub fn completion_channel() -> (Box<dyn Completion>, oneshot::Receiver<bool>) {
    let (sender, receiver) = oneshot::channel();

    let completion: Box<dyn Completion> = Box::new(move |success: bool| {
        let _ = sender.send(success);
    });

    (completion, receiver)
}

/// Verb-specific half of a persist command: request construction and
/// response interpretation. The verb set is closed, so commands are
/// parameterized statically rather than dispatched at runtime.
pub trait PersistVerb {
    /// Verb name used in diagnostics.
    const NAME: &'static str;
    /// Endpoint requests are dispatched to.
    const ENDPOINT: &'static str;
    /// Whether the activity must already hold a persisted identity.
    const REQUIRES_TOKEN: bool;

    /// Builds the request body. Validates preconditions first; a failure
    /// here aborts the command before anything reaches the transport.
    fn update_params(activity: &Activity) -> Result<Value, PersistError>;

    /// Interprets the transport outcome and applies it to the persist
    /// token. Invoked exactly once per command. Must never panic: every
    /// failure mode is returned as a `PersistError` so the command can
    /// translate it into a failure completion.
    fn persist_response(
        activity: &mut Activity,
        result: &Result<Value, TransportError>,
    ) -> Result<(), PersistError>;
}

pub(crate) fn validate(
    activity: &Activity,
    require_existing_token: bool,
) -> Result<(), PersistError> {
    if require_existing_token && !activity.persist_token().is_valid() {
        return Err(PersistError::InvalidState(
            "activity has no persisted identity",
        ));
    }

    Ok(())
}

/// One request/response cycle against the document store. Single-use:
/// `persist` consumes the command, and the bound completion fires exactly
/// once however the cycle ends.
pub struct PersistCommand<V> {
    store: Arc<dyn DocumentStore>,
    activity: Arc<Mutex<Activity>>,
    completion: Box<dyn Completion>,
    verb: PhantomData<V>,
}

impl<V> PersistCommand<V>
where
    V: PersistVerb,
{
    pub fn new(
        store: Arc<dyn DocumentStore>,
        activity: Arc<Mutex<Activity>>,
        completion: Box<dyn Completion>,
    ) -> Self {
        PersistCommand {
            store,
            activity,
            completion,
            verb: PhantomData,
        }
    }

    pub async fn persist(self) {
        let PersistCommand {
            store,
            activity,
            completion,
            ..
        } = self;

        // The activity lock is held only across synchronous sections, never
        // while the request is in flight.
        let params = {
            let guard = match activity.lock() {
                Ok(guard) => guard,
                Err(_) => {
                    tracing::error!(command = V::NAME, "activity lock poisoned");
                    completion.complete(false);
                    return;
                }
            };

            tracing::debug!(activity = guard.id, command = V::NAME, "updating parameters");

            match V::update_params(&guard) {
                Ok(params) => params,
                Err(err) => {
                    tracing::warn!(
                        activity = guard.id,
                        command = V::NAME,
                        error = %err,
                        "failed to build persist parameters"
                    );
                    drop(guard);
                    completion.complete(false);
                    return;
                }
            }
        };

        let result = store.request(V::ENDPOINT, params).await;

        let success = {
            let mut guard = match activity.lock() {
                Ok(guard) => guard,
                Err(_) => {
                    tracing::error!(command = V::NAME, "activity lock poisoned");
                    completion.complete(false);
                    return;
                }
            };

            tracing::debug!(activity = guard.id, command = V::NAME, "processing response");

            if let Err(err) = &result {
                tracing::warn!(
                    activity = guard.id,
                    command = V::NAME,
                    error = %err,
                    "document store request failed"
                );
            }

            match V::persist_response(&mut guard, &result) {
                Ok(()) => true,
                Err(err) => {
                    // specific diagnostics were recorded by the verb hook
                    tracing::debug!(
                        activity = guard.id,
                        command = V::NAME,
                        error = %err,
                        "persist command failed"
                    );
                    false
                }
            }
        };

        completion.complete(success);
    }
}
