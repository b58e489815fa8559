pub mod context;
pub mod crud_service;
pub mod todo_service;
pub mod validation;

pub use context::ServiceContext;
