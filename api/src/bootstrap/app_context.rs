use std::sync::Arc;

use crate::application::ports::user_repository::UserRepository;
use crate::application::security::route_policy::RoutePolicy;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    route_policy: RoutePolicy,
}

impl AppServices {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self::with_policy(user_repo, RoutePolicy::default())
    }

    pub fn with_policy(user_repo: Arc<dyn UserRepository>, route_policy: RoutePolicy) -> Self {
        Self {
            user_repo,
            route_policy,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn route_policy(&self) -> &RoutePolicy {
        &self.services.route_policy
    }
}
