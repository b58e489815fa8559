use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryFilter, QueryOrder, Select,
};

use super::base_traits::{HasCreatedAtColumn, HasIdColumn, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult};

/// Primary key type shared by every base entity.
pub type RecordId = i32;

/// Generic persistence operations over an entity declared with `#[base_entity]`.
///
/// Records are addressed through their integer id column and stamped with
/// `created_at`/`updated_at` here rather than by the database, so every
/// backend sees the same timestamps.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized {
    type Entity: EntityTrait<Model = Self::Model, ActiveModel = Self::ActiveModel>
        + HasCreatedAtColumn
        + HasIdColumn
        + Send
        + Sync;
    type Model: FromQueryResult + IntoActiveModel<Self::ActiveModel> + Send + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + TimestampedActiveModel
        + Send;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    fn not_found(id: RecordId) -> DaoLayerError {
        DaoLayerError::NotFound {
            entity: std::any::type_name::<Self::Entity>(),
            id,
        }
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<Self::ActiveModel> + Send,
    ) -> DaoResult<Self::Model> {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_created_at(now);
        active.set_updated_at(now);
        active.insert(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn find_by_id(&self, id: RecordId) -> DaoResult<Self::Model> {
        let model = Self::Entity::find()
            .filter(Self::Entity::id_column().eq(id))
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        model.ok_or_else(|| Self::not_found(id))
    }

    /// Every row, newest first. Rows sharing a `created_at` fall back to the
    /// higher id first so the order is total.
    async fn find_all(
        &self,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Vec<Self::Model>> {
        apply(Self::Entity::find())
            .order_by_desc(Self::Entity::created_at_column())
            .order_by_desc(Self::Entity::id_column())
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn update<F>(&self, id: RecordId, apply: F) -> DaoResult<Self::Model>
    where
        F: for<'a> FnOnce(&'a mut Self::ActiveModel) + Send,
    {
        let model = self.find_by_id(id).await?;

        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        active.update(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn delete(&self, id: RecordId) -> DaoResult<RecordId> {
        let result = Self::Entity::delete_many()
            .filter(Self::Entity::id_column().eq(id))
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }

        Ok(id)
    }
}
