use sea_orm::DbErr;
use thiserror::Error;

use super::RecordId;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: RecordId },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;
