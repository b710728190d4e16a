use sqlx::{Pool, Postgres};

pub type PgPool = Pool<Postgres>;

/// Opens the shared pool backing the user store.
pub async fn connect_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let db = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(db)
}

/// Applies the `users` schema embedded from ./migrations.
pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(db).await?;
    Ok(())
}

pub mod repositories;
