// todostore - Local to-do list with whole-collection persistence

pub mod backend;
pub mod category;
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod store;

// Re-export main types for convenience
pub use backend::{Backend, DEFAULT_SLOT, FileBackend, MemoryBackend};
pub use category::{Categories, CategoryPolicy};
pub use config::Config;
pub use error::TaskError;
pub use filter::{Field, Filter, FilterOp, FilterValue};
pub use models::{Task, TaskId};
pub use store::TaskStore;
