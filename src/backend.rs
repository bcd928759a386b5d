//! Backend-facing descriptors (data) and strategies (behavior).
//!
//! `descriptor` exposes validated metadata ([`BackendDescriptor`]) covering the base URL, the
//! refresh endpoint, where refreshed tokens travel in the exchange response, default headers,
//! and the transport timeout. `strategy` defines [`SessionStrategy`], an HTTP-client-agnostic
//! hook deciding which statuses mean "access token expired" and how issued tokens are read.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;
