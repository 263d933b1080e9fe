pub mod files;
pub mod repository;
pub mod store;

pub use files::{ensure_data_dir, init_local_data_dir, log_file};
pub use repository::SessionRepository;
pub use store::{FileStore, KeyValueStore, MemoryStore};
