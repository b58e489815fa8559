use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub type TodoId = i32;

/// A todo as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
}

/// Full replacement body for `PUT /api/todos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoUpdate {
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
}

impl TodoUpdate {
    /// Same title and description, done flag flipped.
    pub fn toggled(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            is_done: !todo.is_done,
        }
    }
}
