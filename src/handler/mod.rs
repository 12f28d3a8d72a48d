pub mod auth;
pub mod support;
pub mod users;
