//! Credential value types: redacted secrets, credential pairs, and persisted sessions.

pub mod session;
pub mod token;

pub use session::*;
pub use token::{pair::*, secret::*};
