use clap::{Parser, Subcommand};
use sea_orm::{ActiveModelTrait, ConnectionTrait, IntoActiveModel, Set};
use std::sync::Arc;

use nangpago::{
    app_state::AppState,
    auth::Role,
    config::Config,
    database::{self, schema},
    services::{search_sync, user_service},
};

// Определяем структуру команд CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Утилита командной строки для администрирования NangPaGo.
/// Создание схемы, переиндексация поиска и выпуск токенов.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Схема базы данных.
    Schema {
        #[command(subcommand)]
        schema_command: SchemaCommand,
    },
    /// Поисковый индекс рецептов.
    Search {
        #[command(subcommand)]
        search_command: SearchCommand,
    },
    /// JWT-токены.
    Token {
        #[command(subcommand)]
        token_command: TokenCommand,
    },
    /// Пользователи.
    User {
        #[command(subcommand)]
        user_command: UserCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SchemaCommand {
    /// Создаёт недостающие таблицы и индексы по описаниям сущностей.
    Create,
}

#[derive(Subcommand, Debug)]
enum SearchCommand {
    /// Переносит все рецепты из базы в поисковый индекс.
    Reindex {
        /// Размер пачки (по умолчанию SYNC_BATCH_SIZE).
        #[arg(short, long)]
        batch_size: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Печатает access-токен существующего пользователя.
    Issue {
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Меняет роль пользователя (ROLE_USER или ROLE_ADMIN).
    Role {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        role: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let config = Config::from_env()?;
    let cli = Cli::parse();

    let db = database::connect().await?;

    match cli.command {
        Commands::Schema { schema_command } => match schema_command {
            SchemaCommand::Create => {
                println!("Создание таблиц ({:?})...", db.get_database_backend());
                schema::create_tables(&db).await?;
                println!("Схема актуальна.");
            }
        },
        Commands::Search { search_command } => match search_command {
            SearchCommand::Reindex { batch_size } => {
                let batch_size = batch_size.unwrap_or_else(|| config.effective_sync_batch_size());
                let state = AppState::new(db, config);
                let index = Arc::clone(&state.search);
                println!("Переиндексация в {} (пачки по {})...", index.name(), batch_size);

                let report = search_sync::sync_all(&state.db, index.as_ref(), batch_size).await?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                if !report.failed_ids.is_empty() {
                    return Err(format!(
                        "{} документов не проиндексировано",
                        report.failed_ids.len()
                    )
                    .into());
                }
            }
        },
        Commands::Token { token_command } => match token_command {
            TokenCommand::Issue { email } => {
                let state = AppState::new(db, config);
                let user = user_service::find_by_email(&state.db, &email).await?;
                let principal = user_service::principal_of(&user);
                let token = state.jwt.create_access_token(&principal)?;
                println!("{}", token);
            }
        },
        Commands::User { user_command } => match user_command {
            UserCommand::Role { email, role } => {
                let role: Role = role
                    .parse()
                    .map_err(|_| format!("Неизвестная роль `{}`", role))?;
                let user = user_service::find_by_email(&db, &email).await?;
                let mut active = user.into_active_model();
                active.role = Set(role.as_str().to_string());
                active.update(&db).await?;
                println!("{} теперь {}", email, role);
            }
        },
    }

    Ok(())
}
