//! Client side of the todo app: an HTTP transport for `/api/todos` and a
//! [`TodoClient`] that mirrors the server list and owns a single transient
//! alert.

mod alert;
mod api;
mod client;
mod config;
mod error;
mod types;

pub use alert::{Alert, Severity};
pub use api::{HttpTodoApi, TodoApi};
pub use client::{ClientState, Confirm, SubscriptionId, TodoClient, messages};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use types::{NewTodo, Todo, TodoId, TodoUpdate};
