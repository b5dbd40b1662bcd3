pub mod composer;
pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::ContentDb;
pub use memory::InMemoryStore;
pub use store::{connect_store, GenerationStore, StoreError, StoreStatus, UnavailableStore};
