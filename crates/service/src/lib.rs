//! Business layer on top of `models`.
//! - Contact-request workflows (submission, back-office actions).
//! - Pagination, tag-based read caching, action callback hooks.
//! - Admin authentication and outbound transactional mail.

pub mod auth;
pub mod cache;
pub mod callbacks;
pub mod contacts;
pub mod errors;
pub mod mailer;
pub mod pagination;
#[cfg(test)]
pub mod test_support;
