//! HTTP handlers for todos, users, sign-in and devtools.

pub mod auth;
pub mod devtools;
pub mod todo;
pub mod user;
pub use todo::*;
pub use user::*;
