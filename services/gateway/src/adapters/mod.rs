pub mod backend;
pub mod token_store;

pub use backend::BackendAdapter;
pub use token_store::{FileTokenStore, MemoryTokenStore};
