//! Data models for the date backend.
//!
//! Domain records, discovery projections and the HTTP request/response bodies.

mod profile;
mod requests;
mod user;

pub use profile::*;
pub use requests::*;
pub use user::*;
