//! Domain logic shared by the Greenlight database and API layers.
//!
//! Nothing in this crate touches the database or the network: validation,
//! the runtime wire codec, and list-query filtering all live here so they can
//! be unit tested in isolation.

pub mod error;
pub mod filters;
pub mod runtime;
pub mod types;
pub mod validator;
