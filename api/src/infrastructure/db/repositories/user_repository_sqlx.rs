use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{DuplicateEmail, UserRepository};
use crate::domain::users::{NewUser, Role, User};
use crate::infrastructure::db::PgPool;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_user(row: &PgRow, with_hash: bool) -> anyhow::Result<User> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        role: role.parse::<Role>()?,
        password_hash: if with_hash {
            row.try_get("password_hash").ok()
        } else {
            None
        },
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(
            r#"SELECT id, full_name, email, phone, role, password_hash, created_at
               FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_user(&r, true)).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(
            r#"SELECT id, full_name, email, phone, role, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_user(&r, false)).transpose()
    }

    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        let res = sqlx::query(
            r#"INSERT INTO users (full_name, email, password_hash, phone, role)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, full_name, email, phone, role, created_at"#,
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await;
        match res {
            Ok(row) => map_user(&row, false),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DuplicateEmail.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_if_absent(&self, user: &NewUser) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"INSERT INTO users (full_name, email, password_hash, phone, role)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (email) DO NOTHING"#,
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
