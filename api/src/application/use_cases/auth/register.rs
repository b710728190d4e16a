use crate::application::ports::user_repository::{DuplicateEmail, UserRepository};
use crate::application::security::password::hash_password_blocking;
use crate::domain::users::{NewUser, Role, User};

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("invalid registration: {0}")]
    Invalid(&'static str),
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for RegisterError {
    fn from(err: anyhow::Error) -> Self {
        if err.downcast_ref::<DuplicateEmail>().is_some() {
            RegisterError::DuplicateEmail
        } else {
            RegisterError::Other(err)
        }
    }
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> Result<User, RegisterError> {
        let email = req.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(RegisterError::Invalid("email"));
        }
        if req.password.is_empty() {
            return Err(RegisterError::Invalid("password"));
        }
        let user = NewUser {
            full_name: req.full_name.trim().to_string(),
            email: email.to_string(),
            password_hash: hash_password_blocking(req.password.clone()).await?,
            phone: req.phone.trim().to_string(),
            role: req.role,
        };
        let created = self.repo.create_user(&user).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "user_registered");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::security::password::verify_password;
    use crate::test_support::InMemoryUserRepository;

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: "Dr. Rao".into(),
            email: email.into(),
            password: "pw".into(),
            phone: "555".into(),
            role: Role::Doctor,
        }
    }

    #[tokio::test]
    async fn stores_hashed_password_and_role() {
        let repo = InMemoryUserRepository::default();
        let uc = Register { repo: &repo };
        let user = uc.execute(&request(" rao@example.com ")).await.unwrap();
        assert_eq!(user.email, "rao@example.com");
        assert_eq!(user.role, Role::Doctor);

        let stored = repo.find_by_email("rao@example.com").await.unwrap().unwrap();
        let hash = stored.password_hash.unwrap();
        assert_ne!(hash, "pw");
        assert!(verify_password("pw", &hash));
    }

    #[tokio::test]
    async fn duplicate_email_is_reported() {
        let repo = InMemoryUserRepository::default();
        let uc = Register { repo: &repo };
        uc.execute(&request("rao@example.com")).await.unwrap();
        let err = uc.execute(&request("rao@example.com")).await.unwrap_err();
        assert!(matches!(err, RegisterError::DuplicateEmail));
    }

    #[tokio::test]
    async fn rejects_malformed_input() {
        let repo = InMemoryUserRepository::default();
        let uc = Register { repo: &repo };
        let err = uc.execute(&request("not-an-email")).await.unwrap_err();
        assert!(matches!(err, RegisterError::Invalid("email")));

        let mut req = request("ok@example.com");
        req.password.clear();
        let err = uc.execute(&req).await.unwrap_err();
        assert!(matches!(err, RegisterError::Invalid("password")));
    }
}
