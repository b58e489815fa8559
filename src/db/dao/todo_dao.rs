use sea_orm::{DatabaseConnection, Set};

use super::{DaoBase, DaoResult, RecordId};
use crate::db::entities::prelude::Todo;
use crate::db::entities::todo;

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoDao {
    type Entity = Todo;
    type Model = todo::Model;
    type ActiveModel = todo::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TodoDao {
    pub async fn create_todo(
        &self,
        title: &str,
        description: Option<&str>,
        is_done: bool,
    ) -> DaoResult<todo::Model> {
        let model = todo::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.map(str::to_string)),
            is_done: Set(is_done),
            ..Default::default()
        };
        self.create(model).await
    }

    /// `description` is doubly optional: `None` keeps the stored value,
    /// `Some(None)` clears it.
    pub async fn update_todo(
        &self,
        id: RecordId,
        title: Option<String>,
        description: Option<Option<String>>,
        is_done: Option<bool>,
    ) -> DaoResult<todo::Model> {
        self.update(id, move |active| {
            if let Some(title) = title {
                active.title = Set(title);
            }
            if let Some(description) = description {
                active.description = Set(description);
            }
            if let Some(is_done) = is_done {
                active.is_done = Set(is_done);
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    use crate::db::entities::todo;

    use super::TodoDao;
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn todo_model(id: i32, title: &str, is_done: bool) -> todo::Model {
        let now = ts();
        todo::Model {
            id,
            created_at: now,
            updated_at: now,
            title: title.to_string(),
            description: None,
            is_done,
        }
    }

    #[tokio::test]
    async fn find_by_id_returns_not_found_when_row_is_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<todo::Model>::new()])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.find_by_id(42).await.expect_err("lookup should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn update_todo_returns_not_found_without_writing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<todo::Model>::new()])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao
            .update_todo(7, None, None, Some(true))
            .await
            .expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id: 7, .. }));
    }

    #[tokio::test]
    async fn update_todo_keeps_fields_that_were_not_supplied() {
        let existing = todo_model(3, "X", false);
        let mut updated = existing.clone();
        updated.is_done = true;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing], [updated]])
            .into_connection();
        let dao = TodoDao::new(&db);

        let model = dao
            .update_todo(3, None, None, Some(true))
            .await
            .expect("update should succeed");
        assert_eq!(model.title, "X");
        assert!(model.is_done);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.delete(999).await.expect_err("delete should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id: 999, .. }));
    }

    #[tokio::test]
    async fn find_all_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("list failed".to_string())])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.find_all(|query| query).await.expect_err("list should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
