//! Public runtime surface: the handle clients drive and the errors it returns.

mod errors;
mod handle;

pub use errors::{CacheError, RepositoryError, Result, RuntimeError, TransportError};
pub use handle::RuntimeHandle;
