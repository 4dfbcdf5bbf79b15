use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

use crate::error::AppResult;

const FILE_PRAGMAS: [&str; 2] = ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let in_memory = database_url.contains(":memory:");

    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    if in_memory {
        // Every pooled connection would otherwise get its own empty database.
        options.max_connections(1).min_connections(1);
    }
    let db = Database::connect(options).await?;

    if !in_memory {
        for pragma in FILE_PRAGMAS {
            run_sql(&db, pragma).await?;
        }
    }
    run_sql(&db, "PRAGMA foreign_keys=ON").await?;

    Migrator::up(&db, None).await?;
    tracing::debug!(in_memory, "database ready");
    Ok(db)
}

async fn run_sql(db: &DatabaseConnection, sql: &str) -> AppResult<()> {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_string())).await?;
    Ok(())
}
