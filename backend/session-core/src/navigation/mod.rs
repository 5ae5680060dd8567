//! Screen routes, the guard in front of protected screens, and the router
//! that applies it.

mod guard;
mod route;
mod router;

pub use guard::{AuthorizationGuard, GuardDecision};
pub use route::{LOGIN_PATH, Route};
pub use router::{Navigator, Router};
