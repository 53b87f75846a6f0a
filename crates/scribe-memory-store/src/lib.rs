mod memory;

pub use memory::{MemoryDocumentStore, RecordedRequest};
