pub mod backend;
pub mod notify;
pub mod outcome;
pub mod storage;
pub mod store;

pub use backend::{BackendError, CartBackend};
pub use notify::{NopNotifier, Notice, Notifier};
pub use outcome::{AddOutcome, MutationOutcome, StoreConflict};
pub use storage::{JsonFileStorage, MemoryStorage, SnapshotStorage};
pub use store::CartStore;
