//! Back-office authentication: three-layer architecture (domain, repository,
//! service). Accounts are seeded from configuration; there is no public
//! registration.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::AuthService;
