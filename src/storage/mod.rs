pub mod config;
pub mod file_store;
pub mod memory_store;
