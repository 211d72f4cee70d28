use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;

use super::search::{RecipeDocument, RecipeSearchIndex};
use crate::{database::models::recipes, errors::AppError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub total: u64,
    pub indexed: u64,
    pub failed_ids: Vec<i64>,
}

/// Re-indexes every recipe from the primary store into the search store.
///
/// Documents are keyed by recipe id, so running the sync again overwrites
/// instead of duplicating. Recipes are read in id order, `batch_size` at a
/// time; documents the store rejects are reported in `failed_ids` and the
/// remaining batches still run. A transport failure aborts the sync.
pub async fn sync_all(
    db: &DatabaseConnection,
    index: &dyn RecipeSearchIndex,
    batch_size: u64,
) -> Result<SyncReport, AppError> {
    let mut paginator = recipes::Entity::find()
        .order_by_asc(recipes::Column::Id)
        .paginate(db, batch_size.max(1));

    let mut report = SyncReport::default();
    while let Some(batch) = paginator.fetch_and_next().await? {
        let documents: Vec<RecipeDocument> = batch.iter().map(RecipeDocument::from).collect();
        let outcome = index.bulk_index(&documents).await?;

        report.total += documents.len() as u64;
        report.indexed += outcome.indexed as u64;
        report.failed_ids.extend(outcome.failed_ids);
    }

    log::info!(
        "search sync into {} finished: total={} indexed={} failed={}",
        index.name(),
        report.total,
        report.indexed,
        report.failed_ids.len()
    );
    Ok(report)
}
