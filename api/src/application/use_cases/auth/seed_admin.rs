use crate::application::ports::user_repository::UserRepository;
use crate::application::security::password::hash_password_blocking;
use crate::domain::users::{NewUser, Role};

/// The administrator account guaranteed to exist after startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
}

pub struct SeedAdmin<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> SeedAdmin<'a, R> {
    pub async fn execute(&self, seed: &AdminSeed) -> anyhow::Result<SeedOutcome> {
        if self.repo.exists_by_email(&seed.email).await? {
            tracing::debug!(email = %seed.email, "admin_seed_skipped");
            return Ok(SeedOutcome::AlreadyPresent);
        }
        let admin = NewUser {
            full_name: seed.full_name.clone(),
            email: seed.email.clone(),
            password_hash: hash_password_blocking(seed.password.clone()).await?,
            phone: seed.phone.clone(),
            role: Role::Admin,
        };
        // Another instance may have inserted between the check and here.
        if self.repo.insert_if_absent(&admin).await? {
            tracing::info!(email = %seed.email, "admin_seeded");
            Ok(SeedOutcome::Created)
        } else {
            tracing::debug!(email = %seed.email, "admin_seed_skipped");
            Ok(SeedOutcome::AlreadyPresent)
        }
    }
}
