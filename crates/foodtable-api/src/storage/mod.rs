// Storage layer for the Food Table API
// Decision: Support both MongoDB (production) and in-memory (dev mode)
//
// - MongoDatabase: official driver, raw BSON documents converted to JSON
// - InMemoryDatabase: vectors behind RwLocks, same wire results
// - StorageBackend: enum dispatch the handlers talk to

pub mod backend;
pub mod memory;
pub mod models;
pub mod mongo;

pub use backend::{StorageBackend, StorageConfig};
pub use memory::InMemoryDatabase;
pub use models::*;
pub use mongo::MongoDatabase;

/// Shared handle used by every route
pub type Database = StorageBackend;
