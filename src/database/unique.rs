use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, SqlErr, TransactionTrait,
};

use crate::errors::AppError;

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Inserts the row under a savepoint. `Ok(false)` means a concurrent request
/// already inserted it; the surrounding transaction stays usable.
pub async fn insert_once<A>(txn: &DatabaseTransaction, model: A) -> Result<bool, AppError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let savepoint = txn.begin().await?;
    match model.insert(&savepoint).await {
        Ok(_) => {
            savepoint.commit().await?;
            Ok(true)
        }
        Err(err) if is_unique_violation(&err) => {
            log::debug!("row already present: {}", err);
            savepoint.rollback().await?;
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}
