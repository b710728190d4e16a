use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::user_repository::{DuplicateEmail, UserRepository};
use crate::application::security::password::hash_password;
use crate::bootstrap::app_context::{AppContext, AppServices};
use crate::bootstrap::config::Config;
use crate::domain::users::{NewUser, Role, User};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    hidden: Mutex<HashSet<String>>,
}

impl InMemoryUserRepository {
    pub fn add(&self, email: &str, password: &str, role: Role) -> User {
        let user = User {
            id: Uuid::new_v4(),
            full_name: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
            phone: String::new(),
            role,
            password_hash: Some(hash_password(password).unwrap()),
            created_at: chrono::Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn count_by_email(&self, email: &str) -> usize {
        self.users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.email == email)
            .count()
    }

    /// Makes `exists_by_email` report false for `email`, simulating a concurrent insert.
    pub fn hide_from_existence_checks(&self, email: &str) {
        self.hidden.lock().unwrap().insert(email.to_string());
    }

    fn insert(&self, new: &NewUser) -> User {
        let user = User {
            id: Uuid::new_v4(),
            full_name: new.full_name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            role: new.role,
            password_hash: Some(new.password_hash.clone()),
            created_at: chrono::Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        if self.hidden.lock().unwrap().contains(email) {
            return Ok(false);
        }
        Ok(self.count_by_email(email) > 0)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned().map(|mut u| {
            u.password_hash = None;
            u
        }))
    }

    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        if self.count_by_email(&user.email) > 0 {
            return Err(DuplicateEmail.into());
        }
        let mut created = self.insert(user);
        created.password_hash = None;
        Ok(created)
    }

    async fn insert_if_absent(&self, user: &NewUser) -> anyhow::Result<bool> {
        if self.count_by_email(&user.email) > 0 {
            return Ok(false);
        }
        self.insert(user);
        Ok(true)
    }
}

pub fn test_config() -> Config {
    Config {
        api_port: 0,
        frontend_url: None,
        database_url: String::new(),
        jwt_secret: "test-secret-for-unit-tests".into(),
        jwt_expires_secs: 3600,
        auth_realm: "consult".into(),
        admin_full_name: "Admin".into(),
        admin_email: "admin@gmail.com".into(),
        admin_password: "admin@123".into(),
        admin_phone: "9059021804".into(),
        is_production: false,
    }
}

pub fn test_context(repo: Arc<InMemoryUserRepository>) -> AppContext {
    AppContext::new(test_config(), AppServices::new(repo))
}
