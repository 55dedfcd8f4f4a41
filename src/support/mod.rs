pub mod models;
pub mod session;

pub use models::{ChatMessage, SupportStage, Transcript};
pub use session::{SendOutcome, SupportSession};
