//! Bearer and refresh token values.

pub mod pair;
pub mod secret;
