pub mod password;
pub mod route_policy;

use uuid::Uuid;

use crate::domain::users::{Role, User};

/// The authenticated caller attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("bad credentials")]
    InvalidCredentials,
    #[error("access denied")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
