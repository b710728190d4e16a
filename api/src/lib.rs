// Module layout (Clean Architecture style)
// - bootstrap: configuration, startup seeding, shared context
// - infrastructure: Postgres adapters
// - presentation: HTTP handlers, routing and the security filter
// - application: route policy, password hashing, auth use cases
// - domain: user accounts and roles

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
pub(crate) mod test_support;
