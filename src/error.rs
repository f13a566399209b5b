// Rejections returned by store operations

use thiserror::Error;

/// Why a task operation refused to change the collection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Task title cannot be empty or whitespace-only")]
    EmptyTitle,

    #[error("Unknown category: {category:?}")]
    UnknownCategory { category: String },
}
