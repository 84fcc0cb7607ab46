//! Forum user API integration
//!
//! Signed access to the forum platform's uAPI and the pagination walk that
//! collects users with a home-page link for the directory loader.

pub mod client;
pub mod users;

// Re-export commonly used types
pub use client::{ForumApi, HttpForumClient, UsersPage};
pub use users::fetch_users_with_home_page;
