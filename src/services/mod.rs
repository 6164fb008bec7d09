use thiserror::Error;

use crate::db::StorageError;
use crate::models::ValidationError;

pub mod dispatcher;
pub mod reply;

pub use dispatcher::Dispatcher;
pub use reply::Reply;

/// Why a slash command could not be carried out
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invoker is not allowed to do this")]
    Unauthorized,
    #[error("no credential registered and no default configured")]
    NoCredentialAvailable,
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
