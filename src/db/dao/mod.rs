pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod todo_dao;

pub use base::{DaoBase, RecordId};
pub use base_traits::{HasCreatedAtColumn, HasIdColumn, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use todo_dao::TodoDao;
