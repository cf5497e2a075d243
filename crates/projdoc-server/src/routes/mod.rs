//! HTTP route handlers

pub mod documents;
pub mod projects;
pub mod templates;
pub mod users;
