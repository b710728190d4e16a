use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::users::{NewUser, User};

/// Returned (inside `anyhow::Error`) by `create_user` when the email is taken.
#[derive(Debug, thiserror::Error)]
#[error("email already registered")]
pub struct DuplicateEmail;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool>;
    /// Includes the stored password hash.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User>;
    /// Inserts unless an account with the same email exists. Returns whether a row was written.
    async fn insert_if_absent(&self, user: &NewUser) -> anyhow::Result<bool>;
}
