pub mod public;
mod router;
pub mod views;

pub use router::{SESSION_COOKIE, api_router, router};
