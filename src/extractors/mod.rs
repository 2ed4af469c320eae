//! Request extractors: validated input, injected services, the current identity.

mod identity;
mod inject;
mod validated;

pub use identity::CurrentUser;
pub use inject::{FromAppState, Inject};
pub use validated::{RequestInput, RequestSchema, Validated, MAX_BODY_BYTES};
