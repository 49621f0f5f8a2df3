pub mod base_storage;
pub mod profile_store;

pub use base_storage::ProfileStorage;
pub use profile_store::ProfileStore;
