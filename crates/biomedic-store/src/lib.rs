// ABOUTME: Persistence layer for biomedic, backing the core KeyValueStore adapter with files on disk.

pub mod file_store;

pub use file_store::FileStore;
