use crate::{
    db::dao::{RecordId, TodoDao},
    db::entities::todo,
    error::AppError,
    services::{
        crud_service::{CrudErrors, CrudOp, CrudService},
        validation::{NewTodo, TodoPatch},
    },
};

pub const TODO_NOT_FOUND: &str = "Todo not found";

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    /// Newest first.
    pub async fn list_all(&self) -> Result<Vec<todo::Model>, AppError> {
        CrudService::find_all(self, |query| query).await
    }

    pub async fn create(&self, new_todo: NewTodo) -> Result<todo::Model, AppError> {
        let todo = self
            .todo_dao
            .create_todo(new_todo.title(), new_todo.description(), new_todo.is_done())
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))?;
        tracing::info!(todo_id = todo.id, "todo created");
        Ok(todo)
    }

    pub async fn get(&self, id: RecordId) -> Result<todo::Model, AppError> {
        CrudService::find_by_id(self, id).await
    }

    pub async fn update(&self, id: RecordId, patch: TodoPatch) -> Result<todo::Model, AppError> {
        let (title, description, is_done) = patch.into_parts();
        let todo = self
            .todo_dao
            .update_todo(id, title, description, is_done)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))?;
        tracing::info!(todo_id = id, is_done = todo.is_done, "todo updated");
        Ok(todo)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), AppError> {
        CrudService::delete(self, id).await?;
        tracing::info!(todo_id = id, "todo deleted");
        Ok(())
    }
}

impl CrudService for TodoService {
    type Dao = TodoDao;

    fn dao(&self) -> &Self::Dao {
        &self.todo_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Failed to create todo",
            find_failed: "Failed to load todos",
            not_found: TODO_NOT_FOUND,
            update_failed: "Failed to update todo",
            delete_failed: "Failed to delete todo",
        }
    }
}
