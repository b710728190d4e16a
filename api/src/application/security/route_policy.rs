//! Ordered, first-match-wins table deciding who may reach which path.
//!
//! Patterns use a small ant-style subset: `/a/b` matches that path only,
//! `/a/b/**` matches `/a/b` and everything below it, `/**` matches any path.
//! The HTTP method is not part of the decision.

use crate::application::security::Principal;
use crate::domain::users::Role;

/// Paths reachable without credentials.
pub const PUBLIC_PATHS: &[&str] = &[
    "/api/doctor/register",
    "/api/login",
    "/api/doctor/search",
    "/api/home/doctor/**",
    "/api/user/register",
    "/api/user/profile/**",
    "/api/admin/ping",
    "/api/doctor/profile/**",
    "/api/user/change-password/**",
    "/api/appointments/doctor/**",
    "/api/appointments/user/**",
    "/api/appointments/approve/**",
    "/api/appointments/complete/**",
    "/api/payments/pay/**",
    "/api/appointments/book",
    "/api/notifications/**",
    "/api/admin/appointments",
    "/api/admin/pending",
    "/api/admin/approve-doctor/**",
    "/api/admin/dashboard",
];

/// Everything under this prefix not listed in [`PUBLIC_PATHS`] needs `ADMIN`.
pub const ADMIN_PATHS: &str = "/api/admin/**";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Subtree(String),
    Any,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "/**" {
            return PathPattern::Any;
        }
        match pattern.strip_suffix("/**") {
            Some(base) => PathPattern::Subtree(base.to_string()),
            None => PathPattern::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Subtree(base) => match path.strip_prefix(base.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
            PathPattern::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    HasRole(Role),
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: PathPattern,
    pub access: Access,
}

impl Rule {
    pub fn new(pattern: &str, access: Access) -> Self {
        Self {
            pattern: PathPattern::parse(pattern),
            access,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    /// No (valid) principal; the caller should authenticate.
    Challenge,
    /// Authenticated but lacking the required role.
    Deny,
}

#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<Rule>,
}

impl RoutePolicy {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Access level of the first rule matching `path`; unmatched paths need authentication.
    pub fn access_for(&self, path: &str) -> Access {
        self.rules
            .iter()
            .find(|r| r.pattern.matches(path))
            .map(|r| r.access)
            .unwrap_or(Access::Authenticated)
    }

    pub fn decide(&self, path: &str, principal: Option<&Principal>) -> Decision {
        match (self.access_for(path), principal) {
            (Access::Public, _) => Decision::Permit,
            (_, None) => Decision::Challenge,
            (Access::Authenticated, Some(_)) => Decision::Permit,
            (Access::HasRole(role), Some(p)) if p.has_role(role) => Decision::Permit,
            (Access::HasRole(_), Some(_)) => Decision::Deny,
        }
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        let mut rules: Vec<Rule> = PUBLIC_PATHS
            .iter()
            .map(|p| Rule::new(p, Access::Public))
            .collect();
        rules.push(Rule::new(ADMIN_PATHS, Access::HasRole(Role::Admin)));
        rules.push(Rule::new("/**", Access::Authenticated));
        Self::new(rules)
    }
}
