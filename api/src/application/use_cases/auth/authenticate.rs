use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::application::security::Principal;
use crate::application::security::password::{verify_dummy_blocking, verify_password_blocking};

/// Turns credentials into a [`Principal`] using the user store and the password hasher.
pub struct Authenticate<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> Authenticate<'a, R> {
    pub async fn with_password(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<Principal>> {
        let Some(user) = self.repo.find_by_email(email.trim()).await? else {
            // Pay the same hashing cost as a wrong password so timing does not reveal accounts.
            verify_dummy_blocking(password.to_string()).await?;
            return Ok(None);
        };
        let hash = user.password_hash.clone().unwrap_or_default();
        if verify_password_blocking(password.to_string(), hash).await? {
            Ok(Some(Principal::from(user)))
        } else {
            Ok(None)
        }
    }

    /// Bearer tokens only carry the id; the role is re-read so demotions apply immediately.
    pub async fn with_user_id(&self, id: Uuid) -> anyhow::Result<Option<Principal>> {
        Ok(self.repo.find_by_id(id).await?.map(Principal::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::users::Role;
    use crate::test_support::InMemoryUserRepository;
    use std::time::Instant;

    #[tokio::test]
    async fn password_authentication() {
        let repo = InMemoryUserRepository::default();
        let user = repo.add("pat@example.com", "secret", Role::User);
        let uc = Authenticate { repo: &repo };

        let ok = uc.with_password(" pat@example.com ", "secret").await.unwrap();
        assert_eq!(ok.map(|p| p.id), Some(user.id));
        assert!(uc.with_password("pat@example.com", "wrong").await.unwrap().is_none());
        assert!(uc.with_password("nobody@example.com", "secret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_email_costs_as_much_as_wrong_password() {
        let repo = InMemoryUserRepository::default();
        repo.add("pat@example.com", "secret", Role::User);
        let uc = Authenticate { repo: &repo };
        // Warm the shared dummy hash so its one-time setup is not measured.
        uc.with_password("warmup@example.com", "x").await.unwrap();

        let started = Instant::now();
        for _ in 0..3 {
            assert!(uc.with_password("pat@example.com", "wrong").await.unwrap().is_none());
        }
        let known = started.elapsed();

        let started = Instant::now();
        for _ in 0..3 {
            assert!(uc.with_password("ghost@example.com", "wrong").await.unwrap().is_none());
        }
        let unknown = started.elapsed();

        assert!(
            unknown * 10 >= known,
            "unknown email answered in {unknown:?}, known email in {known:?}"
        );
    }

    #[tokio::test]
    async fn user_id_resolves_current_role() {
        let repo = InMemoryUserRepository::default();
        let user = repo.add("doc@example.com", "pw", Role::Doctor);
        let uc = Authenticate { repo: &repo };

        let p = uc.with_user_id(user.id).await.unwrap().unwrap();
        assert_eq!(p.role, Role::Doctor);
        assert!(uc.with_user_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}
