//! Creates tables straight from the entity definitions.
//! Used by `DATABASE_AUTO_MIGRATE`, the admin CLI and the test suites.

use sea_orm::sea_query::{Index, IndexCreateStatement, IntoIden};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, EntityTrait, Schema};

use super::models::{
    recipe_comments, recipe_favorites, recipe_likes, recipes, refresh_tokens, users,
};

pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Порядок важен: внешние ключи ссылаются на users и recipes
    create_table(db, &schema, users::Entity).await?;
    create_table(db, &schema, recipes::Entity).await?;
    create_table(db, &schema, recipe_likes::Entity).await?;
    create_table(db, &schema, recipe_favorites::Entity).await?;
    create_table(db, &schema, recipe_comments::Entity).await?;
    create_table(db, &schema, refresh_tokens::Entity).await?;

    create_recipe_user_index::<_, recipe_likes::Entity, _, _>(
        db,
        "uq_recipe_likes_recipe_user",
        recipe_likes::Column::RecipeId,
        recipe_likes::Column::UserId,
    )
    .await?;
    create_recipe_user_index::<_, recipe_favorites::Entity, _, _>(
        db,
        "uq_recipe_favorites_recipe_user",
        recipe_favorites::Column::RecipeId,
        recipe_favorites::Column::UserId,
    )
    .await?;

    log::info!("Database schema is up to date");
    Ok(())
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement)).await?;
    Ok(())
}

async fn create_recipe_user_index<C, E, R, U>(
    db: &C,
    name: &str,
    recipe_col: R,
    user_col: U,
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    R: IntoIden,
    U: IntoIden,
{
    let backend = db.get_database_backend();
    let mut statement: IndexCreateStatement = Index::create()
        .name(name)
        .table(E::default())
        .col(recipe_col)
        .col(user_col)
        .unique()
        .to_owned();

    // MySQL не понимает CREATE INDEX IF NOT EXISTS
    if backend != DbBackend::MySql {
        statement.if_not_exists();
    }

    match db.execute(backend.build(&statement)).await {
        Err(e) if backend == DbBackend::MySql && e.to_string().contains("Duplicate key name") => {
            Ok(())
        }
        other => other.map(|_| ()),
    }
}
