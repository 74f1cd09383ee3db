// Session tokens and role-based gating.
// Tokens are minted by the sign-in provider; this service only verifies them.

pub mod guard;
pub mod handlers;
pub mod session;

pub use guard::require_session;
pub use session::{Role, Session, SessionKeys};
