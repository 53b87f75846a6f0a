mod transport;
mod wire;

pub use transport::{DocumentStore, TransportError};
pub use wire::{
    DelRequest, PutRequest, ID_FIELD, KIND_FIELD, RESULTS_FIELD, RESULT_ID_FIELD,
    RESULT_REV_FIELD, REV_FIELD,
};
