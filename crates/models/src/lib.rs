pub mod admin;
pub mod admin_credentials;
pub mod attachment;
pub mod contact_request;
pub mod db;
pub mod errors;
