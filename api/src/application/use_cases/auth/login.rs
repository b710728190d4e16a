use crate::application::ports::user_repository::UserRepository;
use crate::application::security::Principal;
use crate::application::use_cases::auth::authenticate::Authenticate;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> anyhow::Result<Option<Principal>> {
        Authenticate { repo: self.repo }
            .with_password(&req.email, &req.password)
            .await
    }
}
