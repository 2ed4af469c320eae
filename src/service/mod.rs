//! Domain services, resolved per request through `Inject`.

mod auth;
mod todo;
mod user;
pub use auth::{AuthProfile, AuthService};
pub use todo::TodoService;
pub use user::UserService;
