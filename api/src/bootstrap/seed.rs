use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::seed_admin::{AdminSeed, SeedAdmin, SeedOutcome};
use crate::bootstrap::config::Config;

impl From<&Config> for AdminSeed {
    fn from(cfg: &Config) -> Self {
        Self {
            full_name: cfg.admin_full_name.clone(),
            email: cfg.admin_email.clone(),
            password: cfg.admin_password.clone(),
            phone: cfg.admin_phone.clone(),
        }
    }
}

/// Startup step: make sure the configured administrator exists.
pub async fn ensure_admin<R: UserRepository + ?Sized>(
    cfg: &Config,
    repo: &R,
) -> anyhow::Result<SeedOutcome> {
    SeedAdmin { repo }.execute(&AdminSeed::from(cfg)).await
}
